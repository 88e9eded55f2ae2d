use std::sync::Arc;

use tracing::{error, info, warn};

use trawler_phisherman::{ReputationBackend, ReputationError, Transition};
use trawler_types::events::{ReviewAction, Reviewer};
use trawler_types::message::{MessageEdit, PostedMessage};
use trawler_types::models::{ReportId, ReportStatus};

use crate::error::TrawlerError;
use crate::outbound::OutboundQueue;
use crate::render;
use crate::surface::{ChatSurface, InteractionResponder};

/// How a reject reaches the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RejectMode {
    /// `PUT /report/{id}/reject`
    #[default]
    Transition,
    /// `DELETE /report/{id}`
    Delete,
}

/// A reviewer pressed one of the controls on a moderator message.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub action: ReviewAction,
    pub reviewer: Reviewer,
    pub message: PostedMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// The report is closed and the moderator message is inert.
    Closed {
        report_id: ReportId,
        status: ReportStatus,
        /// Another reviewer closed it first; the backend changed nothing.
        already_closed: bool,
        public_updated: usize,
        public_failed: usize,
    },
    /// The backend no longer has the report.
    Vanished { report_id: ReportId },
    /// The transition failed; controls were restored for a manual retry.
    Retryable { report_id: ReportId, error: String },
    /// The message does not identify a report.
    Unidentified,
}

/// Drives the pending → terminal transition from a button press.
pub struct ModerationProcessor {
    backend: Arc<dyn ReputationBackend>,
    surface: Arc<dyn ChatSurface>,
    queue: OutboundQueue,
    reject_mode: RejectMode,
}

impl ModerationProcessor {
    pub fn new(
        backend: Arc<dyn ReputationBackend>,
        surface: Arc<dyn ChatSurface>,
        queue: OutboundQueue,
        reject_mode: RejectMode,
    ) -> Self {
        Self {
            backend,
            surface,
            queue,
            reject_mode,
        }
    }

    pub async fn process(&self, request: ReviewRequest, responder: &dyn InteractionResponder) -> ModerationOutcome {
        let ReviewRequest {
            action,
            reviewer,
            message,
        } = request;

        if let Err(e) = responder.acknowledge().await {
            warn!("Failed to acknowledge review interaction: {}", e);
        }

        let Some((report_id, domain)) = identify(&message) else {
            warn!(message = %message.reference, "Review action on a message without a report id");
            notify(responder, "❌ This message does not belong to a report.").await;
            return ModerationOutcome::Unidentified;
        };

        // No controls while the backend call is in flight
        let controls = message.controls.clone();
        if let Err(e) = self
            .surface
            .edit_message(&message.reference, MessageEdit::controls(Vec::new()))
            .await
        {
            warn!(%report_id, "Failed to strip review controls: {}", e);
        }

        info!(%report_id, domain = %domain, action = action.custom_id(), reviewer = %reviewer.tag, "Review action");

        let transition = match self.apply(&report_id, action).await {
            Ok(transition) => transition,
            Err(ReputationError::NotFound) => {
                warn!(%report_id, "Report vanished before review");
                self.settle(&message, render::not_found_summary(&domain, &reviewer), &report_id)
                    .await;
                notify(responder, "⚠️ The backend returned `Not Found` for this report.").await;
                return ModerationOutcome::Vanished { report_id };
            }
            Err(e) => {
                error!(%report_id, "Review transition failed: {}", e);
                if let Err(restore) = self
                    .surface
                    .edit_message(&message.reference, MessageEdit::controls(controls))
                    .await
                {
                    warn!(%report_id, "Failed to restore review controls: {}", restore);
                }
                let error = e.to_string();
                notify(responder, &TrawlerError::from(e).user_message()).await;
                return ModerationOutcome::Retryable { report_id, error };
            }
        };

        self.settle(&message, render::reviewer_summary(action, &domain, &reviewer), &report_id)
            .await;

        let fan_out = self
            .queue
            .fan_out(&transition.public_messages, &render::public_outcome(action, &domain))
            .await;

        info!(
            %report_id,
            updated = fan_out.updated,
            failed = fan_out.failed,
            already_closed = transition.already_closed,
            "Review complete"
        );

        ModerationOutcome::Closed {
            report_id,
            status: action.target_status(),
            already_closed: transition.already_closed,
            public_updated: fan_out.updated,
            public_failed: fan_out.failed,
        }
    }

    async fn apply(&self, report_id: &ReportId, action: ReviewAction) -> trawler_phisherman::Result<Transition> {
        match (action, self.reject_mode) {
            (ReviewAction::Reject, RejectMode::Delete) => {
                self.backend.delete(report_id).await.map(|()| Transition::default())
            }
            _ => self.backend.transition(report_id, action).await,
        }
    }

    /// Turn the moderator message into a single inert line.
    async fn settle(&self, message: &PostedMessage, summary: String, report_id: &ReportId) {
        if let Err(e) = self
            .surface
            .edit_message(&message.reference, MessageEdit::inert(summary))
            .await
        {
            warn!(%report_id, "Failed to finalise review message: {}", e);
        }
    }
}

/// Report id and domain as rendered on the moderator embed.
fn identify(message: &PostedMessage) -> Option<(ReportId, String)> {
    let embed = message.embeds.first()?;
    let id = embed.field(render::FIELD_REPORT_ID)?.trim();
    if id.is_empty() || id == "Unknown" {
        return None;
    }
    let domain = embed.description.clone().unwrap_or_default();
    Some((ReportId::new(id), domain))
}

async fn notify(responder: &dyn InteractionResponder, content: &str) {
    if let Err(e) = responder.notify(content).await {
        warn!("Failed to notify reviewer: {}", e);
    }
}
