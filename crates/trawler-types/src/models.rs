use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp;

// -- Identifiers --

/// Backend-assigned report identifier. The backend emits it as a number on
/// some endpoints and a string on others, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawReportId", into = "String")]
pub struct ReportId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReportId {
    Number(u64),
    Text(String),
}

impl From<RawReportId> for ReportId {
    fn from(raw: RawReportId) -> Self {
        match raw {
            RawReportId::Number(n) => Self(n.to_string()),
            RawReportId::Text(s) => Self(s),
        }
    }
}

impl From<ReportId> for String {
    fn from(id: ReportId) -> Self {
        id.0
    }
}

impl ReportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pointer to a chat message: the surface (guild) it lives on, its channel
/// and its id. Snowflakes are kept as strings end to end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild: Option<String>,
    pub channel: String,
    pub message: String,
}

impl MessageRef {
    pub fn new(guild: Option<String>, channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            guild,
            channel: channel.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.message)
    }
}

// -- Reports --

/// Moderation status of a report. `pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Suspicious,
    Malicious,
    Rejected,
}

impl ReportStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The authoritative report record as the backend hands it back after a
/// submission. Counters and timestamps are owned by the backend and only
/// ever displayed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub url: String,
    pub domain: String,
    /// Display name of the targeted brand.
    #[serde(default, deserialize_with = "brand_name")]
    pub target: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, rename = "reportedBy")]
    pub reported_by: Option<String>,
    #[serde(default)]
    pub reports: Option<u64>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub reported: Option<DateTime<Utc>>,
    #[serde(default, rename = "reportedLast", deserialize_with = "timestamp::lenient")]
    pub reported_last: Option<DateTime<Utc>>,
    #[serde(default, rename = "review_message")]
    pub review_message: Option<MessageRef>,
    #[serde(default)]
    pub report_messages: Vec<MessageRef>,
    #[serde(default, rename = "urlscanId")]
    pub urlscan_id: Option<String>,
    #[serde(default, rename = "screenshotUrl")]
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
}

/// The backend sends the target either as a bare name or as `{id, name}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Name(String),
    Brand {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

fn brand_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTarget>::deserialize(deserializer)? {
        Some(RawTarget::Name(name)) => Some(name),
        Some(RawTarget::Brand { id, name }) => name.or(id),
        None => None,
    }
    .filter(|name| !name.is_empty()))
}

// -- Classification --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Safe,
    Suspicious,
    Malicious,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Classification {
    /// Whether the backend has reached a verdict on the domain.
    pub fn is_adjudicated(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Per-lookup view of a domain. Never persisted; rebuilt on every lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationRecord {
    pub domain: String,
    pub classification: Classification,
    pub verified: Option<bool>,
    pub detections: u64,
    pub created: Option<DateTime<Utc>>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub targeted_brand: Option<String>,
    pub screenshot: Option<String>,
    /// The classification comes from a report that is still awaiting review.
    pub pending_report: bool,
}

impl ClassificationRecord {
    pub fn unknown(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// Adjudicated and not merely the echo of a pending report.
    pub fn is_settled(&self) -> bool {
        self.classification.is_adjudicated() && !self.pending_report
    }
}

/// Domain summary returned alongside `isKnownDomain` on submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnownDomainInfo {
    #[serde(default)]
    pub domain: String,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default, rename = "targetedBrand")]
    pub targeted_brand: Option<String>,
    #[serde(default)]
    pub detections: Option<Detections>,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub screenshot: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Detections {
    #[serde(default)]
    pub total: u64,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub first: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub last: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub code: Option<String>,
    pub name: Option<String>,
}

// -- Brands --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
}

impl Brand {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}
