use async_trait::async_trait;

use trawler_types::api::{ReportDraft, SubmitOutcome};
use trawler_types::events::ReviewAction;
use trawler_types::models::{Brand, ClassificationRecord, MessageRef, ReportId};

use crate::error::Result;

/// Result of a review transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// Acknowledgement messages shown to submitters of this report.
    pub public_messages: Vec<MessageRef>,
    /// The report was already closed; nothing changed on the backend.
    pub already_closed: bool,
}

/// Operations the bot needs from the reputation backend.
#[async_trait]
pub trait ReputationBackend: Send + Sync {
    /// Current classification of a domain. An absent record is `unknown`.
    async fn lookup(&self, domain: &str) -> Result<ClassificationRecord>;

    /// Submit a report and interpret the answer flags.
    async fn submit(&self, draft: &ReportDraft) -> Result<SubmitOutcome>;

    /// Move a pending report to its terminal state. Idempotent: a report that
    /// is already closed yields `already_closed` instead of an error.
    async fn transition(&self, report_id: &ReportId, action: ReviewAction) -> Result<Transition>;

    /// Remove a report outright (alternative reject path).
    async fn delete(&self, report_id: &ReportId) -> Result<()>;

    /// Record where the moderator message for a report lives.
    async fn link_message(&self, report_id: &ReportId, review_message: &MessageRef) -> Result<()>;

    /// Brand catalogue used for the `brand` option.
    async fn brands(&self) -> Result<Vec<Brand>>;
}
