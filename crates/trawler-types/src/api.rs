use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Classification, ClassificationRecord, KnownDomainInfo, MessageRef, Report,
};
use crate::timestamp;

// -- Lookup --

/// One entry of `GET /v2/domains/info/{domain}`; the response is keyed by
/// domain name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfoEntry {
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub verified_phish: Option<bool>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub targeted_brand: Option<String>,
    #[serde(default)]
    pub phish_caught: Option<u64>,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub pending: bool,
}

impl DomainInfoEntry {
    pub fn into_record(self, domain: &str) -> ClassificationRecord {
        ClassificationRecord {
            domain: domain.to_string(),
            classification: self.classification,
            verified: self.verified_phish,
            detections: self.phish_caught.unwrap_or(0),
            created: self.created.as_deref().and_then(timestamp::parse),
            first_seen: self.first_seen.as_deref().and_then(timestamp::parse),
            last_seen: self.last_seen.as_deref().and_then(timestamp::parse),
            targeted_brand: self.targeted_brand,
            screenshot: self.screenshot,
            pending_report: self.pending,
        }
    }
}

// -- Submission --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandTarget {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Body of `POST /trawler/report`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDraft {
    pub url: String,
    pub domain: String,
    pub target: BrandTarget,
    pub comment: Option<String>,
    #[serde(rename = "reportedBy")]
    pub reported_by: String,
    /// "YYYY-MM-DD HH:MM:SS", UTC.
    pub created: String,
    /// The submitter's acknowledgement message, kept by the backend as a
    /// public message ref.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_message: Option<MessageRef>,
}

/// Flags and payload returned by `POST /trawler/report`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseBody {
    #[serde(default, rename = "isUrlShortner", alias = "isUrlShortener")]
    pub is_url_shortener: bool,
    #[serde(default)]
    pub is_protected_domain: bool,
    #[serde(default)]
    pub is_reported_domain: bool,
    #[serde(default)]
    pub is_known_domain: bool,
    #[serde(default)]
    pub domain_info: Option<Value>,
}

/// Submission result as a tagged variant. Built from the backend flags in a
/// fixed precedence: shortener, protected, created, reported, known.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    UrlShortener,
    ProtectedDomain,
    Created(Report),
    AlreadyReported(Report),
    KnownDomain(KnownDomainInfo),
    /// No flag set and nothing to show.
    Accepted,
}

impl SubmitOutcome {
    /// `created` is true when the backend answered HTTP 201.
    pub fn classify(created: bool, body: SubmitResponseBody) -> Result<Self, serde_json::Error> {
        let SubmitResponseBody {
            is_url_shortener,
            is_protected_domain,
            is_reported_domain,
            is_known_domain,
            domain_info,
        } = body;

        let outcome = match (is_url_shortener, is_protected_domain, created, is_reported_domain) {
            (true, _, _, _) => Self::UrlShortener,
            (_, true, _, _) => Self::ProtectedDomain,
            (_, _, true, _) => Self::Created(serde_json::from_value(domain_info.unwrap_or_default())?),
            (_, _, _, true) => Self::AlreadyReported(serde_json::from_value(domain_info.unwrap_or_default())?),
            _ => match domain_info {
                Some(info) if is_known_domain && !info.is_null() => {
                    Self::KnownDomain(serde_json::from_value(info)?)
                }
                _ => Self::Accepted,
            },
        };

        Ok(outcome)
    }
}

// -- Review --

/// Body of `PUT /trawler/report/{id}` when linking the moderator message.
#[derive(Debug, Serialize)]
pub struct LinkMessageRequest<'a> {
    pub review_message: &'a MessageRef,
}

/// Body of `PUT /trawler/report/{id}/{approve|reject}`.
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransitionResponseBody {
    #[serde(default)]
    pub data: Option<TransitionData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransitionData {
    #[serde(default)]
    pub report_messages: Vec<MessageRef>,
}
