// Recording mocks for the backend and chat-surface seams.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;

use trawler_phisherman::{ReputationBackend, ReputationError, Transition};
use trawler_types::api::{ReportDraft, SubmitOutcome};
use trawler_types::events::ReviewAction;
use trawler_types::message::{MessageEdit, OutboundMessage, PostedMessage};
use trawler_types::models::{
    Brand, ClassificationRecord, MessageRef, Report, ReportId, ReportStatus,
};

use crate::surface::{ChatSurface, InteractionResponder, SurfaceError};

pub const REVIEW_CHANNEL: &str = "900";

pub fn report(id: &str, domain: &str) -> Report {
    Report {
        id: ReportId::new(id),
        url: format!("https://{}/login", domain),
        domain: domain.to_string(),
        target: Some("Steam".into()),
        comment: None,
        reported_by: Some("100".into()),
        reports: Some(1),
        reported: None,
        reported_last: None,
        review_message: None,
        report_messages: Vec::new(),
        urlscan_id: None,
        screenshot_url: None,
        status: ReportStatus::Pending,
    }
}

// =============================================================================
// Mock reputation backend
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unavailable,
    NotFound,
}

impl Failure {
    fn error(self) -> ReputationError {
        match self {
            Self::Unavailable => ReputationError::BackendUnavailable("connection refused".into()),
            Self::NotFound => ReputationError::NotFound,
        }
    }
}

/// Stateful stand-in for the backend. Transitions follow the real rule:
/// the first one on a pending report wins, later ones change nothing.
#[derive(Default)]
pub struct MockBackend {
    lookup_record: Mutex<Option<ClassificationRecord>>,
    lookup_failure: Mutex<Option<Failure>>,
    submit_outcome: Mutex<Option<SubmitOutcome>>,
    submit_failure: Mutex<Option<Failure>>,
    transition_failure: Mutex<Option<Failure>>,
    link_failure: Mutex<Option<Failure>>,
    statuses: Mutex<HashMap<String, ReportStatus>>,
    public_messages: Mutex<Vec<MessageRef>>,
    links: Mutex<Vec<(ReportId, MessageRef)>>,
    drafts: Mutex<Vec<ReportDraft>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup(self, record: ClassificationRecord) -> Self {
        *self.lookup_record.lock().unwrap() = Some(record);
        self
    }

    pub fn failing_lookups(self, failure: Failure) -> Self {
        *self.lookup_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn with_submit(self, outcome: SubmitOutcome) -> Self {
        *self.submit_outcome.lock().unwrap() = Some(outcome);
        self
    }

    pub fn failing_submits(self, failure: Failure) -> Self {
        *self.submit_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn failing_transitions(self, failure: Failure) -> Self {
        *self.transition_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn failing_links(self, failure: Failure) -> Self {
        *self.link_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn with_report(self, id: &str, status: ReportStatus) -> Self {
        self.statuses.lock().unwrap().insert(id.to_string(), status);
        self
    }

    pub fn with_public_messages(self, refs: Vec<MessageRef>) -> Self {
        *self.public_messages.lock().unwrap() = refs;
        self
    }

    pub fn heal_transitions(&self) {
        *self.transition_failure.lock().unwrap() = None;
    }

    pub fn status_of(&self, id: &str) -> Option<ReportStatus> {
        self.statuses.lock().unwrap().get(id).copied()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c.starts_with(prefix))
    }

    pub fn links(&self) -> Vec<(ReportId, MessageRef)> {
        self.links.lock().unwrap().clone()
    }

    pub fn drafts(&self) -> Vec<ReportDraft> {
        self.drafts.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ReputationBackend for MockBackend {
    async fn lookup(&self, domain: &str) -> trawler_phisherman::Result<ClassificationRecord> {
        self.record(format!("lookup {}", domain));
        if let Some(failure) = *self.lookup_failure.lock().unwrap() {
            return Err(failure.error());
        }
        Ok(self
            .lookup_record
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| ClassificationRecord::unknown(domain)))
    }

    async fn submit(&self, draft: &ReportDraft) -> trawler_phisherman::Result<SubmitOutcome> {
        self.record(format!("submit {}", draft.domain));
        self.drafts.lock().unwrap().push(draft.clone());
        if let Some(failure) = *self.submit_failure.lock().unwrap() {
            return Err(failure.error());
        }
        Ok(self
            .submit_outcome
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(SubmitOutcome::Accepted))
    }

    async fn transition(&self, report_id: &ReportId, action: ReviewAction) -> trawler_phisherman::Result<Transition> {
        self.record(format!("transition {} {}", report_id, action.custom_id()));
        if let Some(failure) = *self.transition_failure.lock().unwrap() {
            return Err(failure.error());
        }

        let mut statuses = self.statuses.lock().unwrap();
        let status = statuses
            .get_mut(report_id.as_str())
            .ok_or(ReputationError::NotFound)?;

        if status.is_terminal() {
            return Ok(Transition {
                public_messages: Vec::new(),
                already_closed: true,
            });
        }

        *status = action.target_status();
        Ok(Transition {
            public_messages: self.public_messages.lock().unwrap().clone(),
            already_closed: false,
        })
    }

    async fn delete(&self, report_id: &ReportId) -> trawler_phisherman::Result<()> {
        self.record(format!("delete {}", report_id));
        self.statuses
            .lock()
            .unwrap()
            .remove(report_id.as_str())
            .map(|_| ())
            .ok_or(ReputationError::NotFound)
    }

    async fn link_message(&self, report_id: &ReportId, review_message: &MessageRef) -> trawler_phisherman::Result<()> {
        self.record(format!("link {} {}", report_id, review_message));
        if let Some(failure) = *self.link_failure.lock().unwrap() {
            return Err(failure.error());
        }
        self.links
            .lock()
            .unwrap()
            .push((report_id.clone(), review_message.clone()));
        Ok(())
    }

    async fn brands(&self) -> trawler_phisherman::Result<Vec<Brand>> {
        Ok(vec![Brand::new("STEAM", "Steam"), Brand::new("DISCORD", "Discord Inc.")])
    }
}

// =============================================================================
// Mock chat surface
// =============================================================================

fn key(target: &MessageRef) -> (String, String) {
    (target.channel.clone(), target.message.clone())
}

/// In-memory message store that records every post and edit.
pub struct MockSurface {
    messages: Mutex<HashMap<(String, String), PostedMessage>>,
    next_id: AtomicU64,
    posts: Mutex<Vec<(String, OutboundMessage)>>,
    edits: Mutex<Vec<(MessageRef, MessageEdit)>>,
    fetch_failures: Mutex<HashMap<(String, String), SurfaceError>>,
    edit_failures: Mutex<HashMap<(String, String), SurfaceError>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(5000),
            posts: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            fetch_failures: Mutex::new(HashMap::new()),
            edit_failures: Mutex::new(HashMap::new()),
        }
    }

    /// Seed an existing message.
    pub fn insert(&self, message: PostedMessage) {
        self.messages
            .lock()
            .unwrap()
            .insert(key(&message.reference), message);
    }

    /// Simulate a message deleted by a human.
    pub fn delete(&self, target: &MessageRef) {
        self.messages.lock().unwrap().remove(&key(target));
    }

    pub fn fail_fetch(&self, target: &MessageRef, error: SurfaceError) {
        self.fetch_failures.lock().unwrap().insert(key(target), error);
    }

    pub fn fail_edit(&self, target: &MessageRef, error: SurfaceError) {
        self.edit_failures.lock().unwrap().insert(key(target), error);
    }

    pub fn message(&self, target: &MessageRef) -> Option<PostedMessage> {
        self.messages.lock().unwrap().get(&key(target)).cloned()
    }

    pub fn posts(&self) -> Vec<(String, OutboundMessage)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<(MessageRef, MessageEdit)> {
        self.edits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSurface for MockSurface {
    async fn post_message(&self, channel: &str, message: OutboundMessage) -> Result<MessageRef, SurfaceError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let reference = MessageRef::new(Some("1".into()), channel, id.to_string());

        self.posts.lock().unwrap().push((channel.to_string(), message.clone()));
        self.insert(PostedMessage {
            reference: reference.clone(),
            content: message.content.unwrap_or_default(),
            embeds: message.embeds,
            controls: message.controls,
        });
        Ok(reference)
    }

    async fn fetch_message(&self, target: &MessageRef) -> Result<PostedMessage, SurfaceError> {
        if let Some(error) = self.fetch_failures.lock().unwrap().get(&key(target)) {
            return Err(error.clone());
        }
        self.message(target).ok_or(SurfaceError::NotFound)
    }

    async fn edit_message(&self, target: &MessageRef, edit: MessageEdit) -> Result<(), SurfaceError> {
        self.edits.lock().unwrap().push((target.clone(), edit.clone()));
        if let Some(error) = self.edit_failures.lock().unwrap().get(&key(target)) {
            return Err(error.clone());
        }

        let mut messages = self.messages.lock().unwrap();
        let message = messages.get_mut(&key(target)).ok_or(SurfaceError::NotFound)?;
        if let Some(content) = edit.content {
            message.content = content;
        }
        if let Some(embeds) = edit.embeds {
            message.embeds = embeds;
        }
        if let Some(controls) = edit.controls {
            message.controls = controls;
        }
        Ok(())
    }
}

// =============================================================================
// Mock interaction responder
// =============================================================================

#[derive(Default)]
pub struct MockResponder {
    acks: AtomicUsize,
    notices: Mutex<Vec<String>>,
}

impl MockResponder {
    pub fn acks(&self) -> usize {
        self.acks.load(Ordering::SeqCst)
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl InteractionResponder for MockResponder {
    async fn acknowledge(&self) -> Result<(), SurfaceError> {
        self.acks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn notify(&self, content: &str) -> Result<(), SurfaceError> {
        self.notices.lock().unwrap().push(content.to_string());
        Ok(())
    }
}
