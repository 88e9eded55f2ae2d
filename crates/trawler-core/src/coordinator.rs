use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use trawler_phisherman::{BrandCache, ReputationBackend, ReputationError};
use trawler_types::api::{BrandTarget, ReportDraft, SubmitOutcome};
use trawler_types::message::Embed;
use trawler_types::models::{ClassificationRecord, MessageRef, Report};

use crate::error::TrawlerError;
use crate::normalize::{self, NormalizedLink};
use crate::render;
use crate::review::ReviewMessageSync;

/// A validated `/report` submission.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub link: NormalizedLink,
    /// Brand display name as picked by the submitter.
    pub brand: Option<String>,
    pub comment: Option<String>,
    pub submitter_id: String,
    /// The submitter's acknowledgement message, once it exists.
    pub origin: Option<MessageRef>,
}

/// The one reply a submission ends in.
#[derive(Debug, Clone, PartialEq)]
pub enum Acknowledgement {
    Message(String),
    Embed(Embed),
}

pub struct SubmissionCoordinator {
    backend: Arc<dyn ReputationBackend>,
    brands: Arc<BrandCache>,
    review: Arc<ReviewMessageSync>,
    block_test_domains: bool,
}

impl SubmissionCoordinator {
    pub fn new(
        backend: Arc<dyn ReputationBackend>,
        brands: Arc<BrandCache>,
        review: Arc<ReviewMessageSync>,
        block_test_domains: bool,
    ) -> Self {
        Self {
            backend,
            brands,
            review,
            block_test_domains,
        }
    }

    /// Run a submission to completion. Exactly one acknowledgement comes
    /// back on success; errors carry their own user message.
    pub async fn submit(&self, request: ReportRequest) -> Result<Acknowledgement, TrawlerError> {
        let domain = request.link.domain.clone();

        if self.block_test_domains && normalize::is_test_domain(&domain) {
            return Ok(Acknowledgement::Message(render::protected_domain(&domain)));
        }

        // Already adjudicated domains are displayed, never re-reported
        if let Some(record) = self.settled_classification(&domain).await {
            info!(domain = %domain, classification = ?record.classification, "Domain already classified");
            return Ok(Acknowledgement::Embed(render::classification_embed(&record)));
        }

        let draft = self.draft(&request).await;
        let outcome = self.backend.submit(&draft).await.map_err(|e| {
            error!(domain = %domain, "Report submission failed: {}", e);
            TrawlerError::from(e)
        })?;

        let ack = match outcome {
            SubmitOutcome::UrlShortener => Acknowledgement::Message(render::shortener_rejected()),
            SubmitOutcome::ProtectedDomain => Acknowledgement::Message(render::protected_domain(&domain)),
            SubmitOutcome::Created(report) => {
                info!(report_id = %report.id, domain = %domain, "New phish report created");
                self.sync_review(&report).await;
                Acknowledgement::Message(render::submitted(&domain))
            }
            SubmitOutcome::AlreadyReported(report) => {
                info!(report_id = %report.id, domain = %domain, reports = ?report.reports, "Duplicate report of pending domain");
                self.sync_review(&report).await;
                Acknowledgement::Message(render::submitted(&domain))
            }
            SubmitOutcome::KnownDomain(info) => Acknowledgement::Embed(render::known_domain_embed(&info)),
            SubmitOutcome::Accepted => Acknowledgement::Message(render::submitted(&domain)),
        };

        Ok(ack)
    }

    /// Read path for `/check`.
    pub async fn check(&self, domain: &str) -> Result<Embed, TrawlerError> {
        let record = self.backend.lookup(domain).await?;
        Ok(render::classification_embed(&record))
    }

    /// A lookup failure is logged and treated as "not settled".
    async fn settled_classification(&self, domain: &str) -> Option<ClassificationRecord> {
        match self.backend.lookup(domain).await {
            Ok(record) if record.is_settled() => Some(record),
            Ok(_) | Err(ReputationError::NotFound) => None,
            Err(e) => {
                warn!(domain = %domain, "Lookup failed, submitting anyway: {}", e);
                None
            }
        }
    }

    async fn draft(&self, request: &ReportRequest) -> ReportDraft {
        let brand_id = match request.brand.as_deref() {
            Some(name) => self.brands.resolve(name).await.map(|b| b.id),
            None => None,
        };

        ReportDraft {
            url: request.link.url.clone(),
            domain: request.link.domain.clone(),
            target: BrandTarget {
                id: brand_id,
                name: request.brand.clone(),
            },
            comment: request.comment.clone().filter(|c| !c.trim().is_empty()),
            reported_by: request.submitter_id.clone(),
            created: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            report_message: request.origin.clone(),
        }
    }

    /// The report exists at the backend whatever happens to its moderator
    /// message, so the submitter still gets a success reply.
    async fn sync_review(&self, report: &Report) {
        if let Err(e) = self.review.ensure_review_message(report).await {
            error!(report_id = %report.id, "Review message sync failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trawler_types::models::{Classification, KnownDomainInfo};

    use crate::testing::{Failure, MockBackend, MockSurface, REVIEW_CHANNEL, report};

    struct Harness {
        backend: Arc<MockBackend>,
        surface: Arc<MockSurface>,
        coordinator: SubmissionCoordinator,
    }

    fn harness(backend: MockBackend, block_test_domains: bool) -> Harness {
        let backend = Arc::new(backend);
        let surface = Arc::new(MockSurface::new());
        let review = Arc::new(ReviewMessageSync::new(surface.clone(), backend.clone(), REVIEW_CHANNEL));
        let brands = Arc::new(BrandCache::new(backend.clone()));
        let coordinator = SubmissionCoordinator::new(backend.clone(), brands, review, block_test_domains);
        Harness {
            backend,
            surface,
            coordinator,
        }
    }

    fn request(raw: &str) -> ReportRequest {
        ReportRequest {
            link: normalize::normalize_link(Some(raw)).unwrap(),
            brand: Some("Steam".into()),
            comment: Some("  ".into()),
            submitter_id: "100".into(),
            origin: Some(MessageRef::new(Some("1".into()), "42", "4242")),
        }
    }

    fn classified(domain: &str, classification: Classification) -> ClassificationRecord {
        ClassificationRecord {
            classification,
            verified: Some(true),
            ..ClassificationRecord::unknown(domain)
        }
    }

    #[tokio::test]
    async fn adjudicated_domain_is_never_submitted() {
        let h = harness(
            MockBackend::new().with_lookup(classified("evil.com", Classification::Malicious)),
            false,
        );

        let ack = h.coordinator.submit(request("https://evil.com/x")).await.unwrap();

        assert!(matches!(ack, Acknowledgement::Embed(_)));
        assert!(!h.backend.called("submit"));
        assert!(h.surface.posts().is_empty());
    }

    #[tokio::test]
    async fn pending_classification_still_submits() {
        let mut record = classified("evil.com", Classification::Suspicious);
        record.pending_report = true;
        let h = harness(MockBackend::new().with_lookup(record), false);

        h.coordinator.submit(request("https://evil.com/x")).await.unwrap();
        assert!(h.backend.called("submit evil.com"));
    }

    #[tokio::test]
    async fn lookup_outage_falls_through_to_submission() {
        let h = harness(MockBackend::new().failing_lookups(Failure::Unavailable), false);
        let ack = h.coordinator.submit(request("https://evil.com/x")).await.unwrap();
        assert_eq!(ack, Acknowledgement::Message(render::submitted("evil.com")));
        assert!(h.backend.called("submit"));
    }

    #[tokio::test]
    async fn shortener_creates_no_report() {
        let h = harness(MockBackend::new().with_submit(SubmitOutcome::UrlShortener), false);

        let ack = h.coordinator.submit(request("https://bit.ly/abc")).await.unwrap();

        assert_eq!(ack, Acknowledgement::Message(render::shortener_rejected()));
        assert!(h.surface.posts().is_empty());
        assert!(h.backend.links().is_empty());
    }

    #[tokio::test]
    async fn protected_domain_creates_no_report() {
        let h = harness(MockBackend::new().with_submit(SubmitOutcome::ProtectedDomain), false);
        let ack = h.coordinator.submit(request("https://discord.com")).await.unwrap();
        assert_eq!(ack, Acknowledgement::Message(render::protected_domain("discord.com")));
        assert!(h.surface.posts().is_empty());
    }

    #[tokio::test]
    async fn created_report_posts_moderator_message() {
        let h = harness(
            MockBackend::new().with_submit(SubmitOutcome::Created(report("55", "evil-example.com"))),
            false,
        );

        let ack = h
            .coordinator
            .submit(request("https://evil-example.com/login"))
            .await
            .unwrap();

        assert_eq!(ack, Acknowledgement::Message(render::submitted("evil-example.com")));
        let posts = h.surface.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, REVIEW_CHANNEL);
        assert_eq!(h.backend.links().len(), 1);

        let draft = &h.backend.drafts()[0];
        assert_eq!(draft.target.id.as_deref(), Some("STEAM"));
        assert_eq!(draft.target.name.as_deref(), Some("Steam"));
        assert_eq!(draft.comment, None);
        assert_eq!(draft.report_message.as_ref().unwrap().message, "4242");
    }

    #[tokio::test]
    async fn duplicate_report_updates_existing_moderator_message() {
        use trawler_types::message::PostedMessage;

        let first = report("55", "evil-example.com");
        let existing = MessageRef::new(Some("1".into()), REVIEW_CHANNEL, "777");

        let mut again = first.clone();
        again.review_message = Some(existing.clone());
        again.reports = Some(2);
        again.reported_by = Some("200".into());

        let h = harness(MockBackend::new().with_submit(SubmitOutcome::AlreadyReported(again)), false);
        h.surface.insert(PostedMessage {
            reference: existing.clone(),
            content: String::new(),
            embeds: vec![render::review_embed(&first)],
            controls: render::review_controls(&first),
        });

        let ack = h
            .coordinator
            .submit(request("https://evil-example.com/login"))
            .await
            .unwrap();

        assert_eq!(ack, Acknowledgement::Message(render::submitted("evil-example.com")));
        assert!(h.surface.posts().is_empty());
        assert!(h.backend.links().is_empty());

        let embed = h.surface.message(&existing).unwrap().embeds[0].clone();
        assert_eq!(embed.field(render::FIELD_REPORT_COUNT), Some("2"));
        assert_eq!(embed.field(render::FIELD_REPORTER), Some("<@100>"));
    }

    #[tokio::test]
    async fn known_domain_payload_is_displayed() {
        let info = KnownDomainInfo {
            domain: "evil.com".into(),
            verified: Some(false),
            ..Default::default()
        };
        let h = harness(MockBackend::new().with_submit(SubmitOutcome::KnownDomain(info)), false);

        let ack = h.coordinator.submit(request("https://evil.com")).await.unwrap();
        let Acknowledgement::Embed(embed) = ack else {
            panic!("expected embed");
        };
        assert_eq!(embed.title.as_deref(), Some("evil.com"));
        assert!(h.surface.posts().is_empty());
    }

    #[tokio::test]
    async fn submission_failure_is_surfaced() {
        let h = harness(MockBackend::new().failing_submits(Failure::Unavailable), false);
        let err = h.coordinator.submit(request("https://evil.com")).await.unwrap_err();
        assert!(matches!(err, TrawlerError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn review_sync_failure_still_acknowledges_once() {
        let mut r = report("55", "evil.com");
        let stale = MessageRef::new(None, REVIEW_CHANNEL, "1");
        r.review_message = Some(stale.clone());
        let h = harness(MockBackend::new().with_submit(SubmitOutcome::AlreadyReported(r)), false);
        h.surface.fail_fetch(&stale, crate::surface::SurfaceError::RateLimited);

        let ack = h.coordinator.submit(request("https://evil.com")).await.unwrap();
        assert_eq!(ack, Acknowledgement::Message(render::submitted("evil.com")));
    }

    #[tokio::test]
    async fn test_domains_are_blocked_in_production() {
        let h = harness(MockBackend::new(), true);
        let ack = h
            .coordinator
            .submit(request("https://x.test.phisherman.gg"))
            .await
            .unwrap();
        assert_eq!(ack, Acknowledgement::Message(render::protected_domain("x.test.phisherman.gg")));
        assert!(h.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn check_renders_lookup() {
        let h = harness(MockBackend::new(), false);
        let embed = h.coordinator.check("unknown.com").await.unwrap();
        assert!(embed.description.unwrap().contains("not known"));
    }
}
