use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use trawler_types::api::{
    DomainInfoEntry, LinkMessageRequest, ReportDraft, SubmitOutcome, SubmitResponseBody,
    TransitionRequest, TransitionResponseBody,
};
use trawler_types::events::ReviewAction;
use trawler_types::models::{Brand, ClassificationRecord, MessageRef, ReportId};

use crate::backend::{ReputationBackend, Transition};
use crate::error::{ReputationError, Result};

const USER_AGENT: &str = "Trawler (+https://phisherman.gg)";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct PhishermanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PhishermanClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success status onto the error taxonomy.
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ReputationError::NotFound);
        }

        let message = resp.text().await.unwrap_or_default();
        if status.is_server_error() {
            Err(ReputationError::BackendUnavailable(format!("HTTP {}: {}", status.as_u16(), message)))
        } else {
            Err(ReputationError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Decode a body that the backend is allowed to leave empty.
    async fn decode_or_default<T: DeserializeOwned + Default>(resp: Response) -> Result<T> {
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ReputationBackend for PhishermanClient {
    async fn lookup(&self, domain: &str) -> Result<ClassificationRecord> {
        let resp = self
            .http
            .get(self.url(&format!("/v2/domains/info/{}", domain)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let resp = match Self::check(resp).await {
            Ok(resp) => resp,
            Err(ReputationError::NotFound) => return Ok(ClassificationRecord::unknown(domain)),
            Err(e) => return Err(e),
        };

        let entries: Option<HashMap<String, Option<DomainInfoEntry>>> =
            Self::decode_or_default(resp).await?;
        let record = entries
            .unwrap_or_default()
            .remove(domain)
            .flatten()
            .map(|entry| entry.into_record(domain))
            .unwrap_or_else(|| ClassificationRecord::unknown(domain));

        debug!(domain, classification = ?record.classification, "Domain lookup");
        Ok(record)
    }

    async fn submit(&self, draft: &ReportDraft) -> Result<SubmitOutcome> {
        let resp = self
            .http
            .post(self.url("/trawler/report"))
            .bearer_auth(&self.api_key)
            .json(draft)
            .send()
            .await?;

        let resp = Self::check(resp).await?;
        let created = resp.status() == StatusCode::CREATED;
        let body: SubmitResponseBody = Self::decode_or_default(resp).await?;

        let outcome = SubmitOutcome::classify(created, body)?;
        info!(domain = %draft.domain, created, "Report submitted");
        Ok(outcome)
    }

    async fn transition(&self, report_id: &ReportId, action: ReviewAction) -> Result<Transition> {
        let resp = self
            .http
            .put(self.url(&format!("/trawler/report/{}/{}", report_id, action.verb())))
            .bearer_auth(&self.api_key)
            .json(&TransitionRequest {
                classification: action.classification(),
            })
            .send()
            .await?;

        // 409: another reviewer got there first. The report is closed and
        // that is all the caller needs to know.
        if resp.status() == StatusCode::CONFLICT {
            info!(%report_id, "Report already closed");
            return Ok(Transition {
                public_messages: Vec::new(),
                already_closed: true,
            });
        }

        let resp = Self::check(resp).await?;
        let body: TransitionResponseBody = Self::decode_or_default(resp).await?;

        Ok(Transition {
            public_messages: body.data.map(|d| d.report_messages).unwrap_or_default(),
            already_closed: false,
        })
    }

    async fn delete(&self, report_id: &ReportId) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/trawler/report/{}", report_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn link_message(&self, report_id: &ReportId, review_message: &MessageRef) -> Result<()> {
        let resp = self
            .http
            .put(self.url(&format!("/trawler/report/{}", report_id)))
            .bearer_auth(&self.api_key)
            .json(&LinkMessageRequest { review_message })
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn brands(&self) -> Result<Vec<Brand>> {
        let resp = self
            .http
            .get(self.url("/v2/brands"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }
}
