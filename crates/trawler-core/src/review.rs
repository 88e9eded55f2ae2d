use std::sync::Arc;

use tracing::{info, warn};

use trawler_phisherman::ReputationBackend;
use trawler_types::message::{Embed, MessageEdit, OutboundMessage};
use trawler_types::models::{MessageRef, Report};

use crate::error::TrawlerError;
use crate::render;
use crate::surface::{ChatSurface, SurfaceError};

/// What `ensure_review_message` had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewSync {
    /// First moderator message for the report.
    Created(MessageRef),
    /// Existing message edited in place.
    Updated(MessageRef),
    /// The stored message was gone; a new one was posted and re-linked.
    Recreated(MessageRef),
}

impl ReviewSync {
    pub fn reference(&self) -> &MessageRef {
        match self {
            Self::Created(r) | Self::Updated(r) | Self::Recreated(r) => r,
        }
    }
}

/// Owns the single control-bearing moderator message of each report.
pub struct ReviewMessageSync {
    surface: Arc<dyn ChatSurface>,
    backend: Arc<dyn ReputationBackend>,
    review_channel: String,
}

impl ReviewMessageSync {
    pub fn new(
        surface: Arc<dyn ChatSurface>,
        backend: Arc<dyn ReputationBackend>,
        review_channel: impl Into<String>,
    ) -> Self {
        Self {
            surface,
            backend,
            review_channel: review_channel.into(),
        }
    }

    /// Make sure the report has exactly one live moderator message, creating,
    /// updating or recreating it as needed.
    pub async fn ensure_review_message(&self, report: &Report) -> Result<ReviewSync, TrawlerError> {
        let Some(existing) = report.review_message.as_ref() else {
            return self.create(report).await.map(ReviewSync::Created);
        };

        match self.surface.fetch_message(existing).await {
            Ok(message) => match message.embeds.into_iter().next() {
                Some(mut embed) => {
                    apply_counters(&mut embed, report);
                    match self
                        .surface
                        .edit_message(existing, MessageEdit::embeds(vec![embed]))
                        .await
                    {
                        Ok(()) => {
                            info!(report_id = %report.id, message = %existing, "Review message updated");
                            Ok(ReviewSync::Updated(existing.clone()))
                        }
                        // Deleted between the fetch and the edit
                        Err(SurfaceError::NotFound) => {
                            warn!(report_id = %report.id, message = %existing, "Review message vanished during update, recreating");
                            self.create(report).await.map(ReviewSync::Recreated)
                        }
                        Err(e) => Err(e.into()),
                    }
                }
                // Inert history from an earlier review cannot carry controls
                None => {
                    warn!(report_id = %report.id, message = %existing, "Review message has no embed, posting a new one");
                    self.create(report).await.map(ReviewSync::Recreated)
                }
            },
            Err(SurfaceError::NotFound) => {
                warn!(report_id = %report.id, message = %existing, "Review message was deleted, recreating");
                self.create(report).await.map(ReviewSync::Recreated)
            }
            Err(e) => {
                warn!(report_id = %report.id, message = %existing, "Could not fetch review message: {}", e);
                Err(e.into())
            }
        }
    }

    async fn create(&self, report: &Report) -> Result<MessageRef, TrawlerError> {
        let message = OutboundMessage {
            content: None,
            embeds: vec![render::review_embed(report)],
            controls: render::review_controls(report),
        };

        let reference = self.surface.post_message(&self.review_channel, message).await?;
        info!(report_id = %report.id, domain = %report.domain, message = %reference, "Review message posted");

        // The message exists either way; a failed link only means the next
        // update will not find it and posts a fresh one.
        if let Err(e) = self.backend.link_message(&report.id, &reference).await {
            warn!(report_id = %report.id, "Failed to link review message: {}", e);
        }

        Ok(reference)
    }
}

/// Refresh the backend-owned counters on an existing moderator embed.
/// Reporter, report id, URL and comment are left as first posted.
fn apply_counters(embed: &mut Embed, report: &Report) {
    if let Some(count) = report.reports {
        embed.set_field(render::FIELD_REPORT_COUNT, count.to_string());
    }
    if let Some(first) = report.reported {
        embed.set_field(render::FIELD_FIRST_REPORTED, render::discord_time(first));
    }
    if let Some(last) = report.reported_last {
        embed.set_field(render::FIELD_LAST_REPORTED, render::discord_time(last));
    }
    if report.target.is_some() {
        embed.set_field(render::FIELD_TARGET, render::target_label(report));
    }
}
