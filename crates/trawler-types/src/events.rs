use serde::{Deserialize, Serialize};

use crate::models::{Classification, ReportStatus};

/// Reviewer actions carried by the controls on a moderator message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    ApproveSuspicious,
    ApproveMalicious,
    Reject,
}

impl ReviewAction {
    pub const ALL: [ReviewAction; 3] = [Self::ApproveSuspicious, Self::ApproveMalicious, Self::Reject];

    /// Identifier attached to the control.
    pub fn custom_id(self) -> &'static str {
        match self {
            Self::ApproveSuspicious => "approve_suspicious",
            Self::ApproveMalicious => "approve_malicious",
            Self::Reject => "reject",
        }
    }

    /// Resolve a control identifier. Messages posted by older releases carry
    /// the `*_new_phish` identifiers, which are still honoured.
    pub fn from_custom_id(id: &str) -> Option<Self> {
        match id {
            "approve_suspicious" | "approve_new_phish" => Some(Self::ApproveSuspicious),
            "approve_malicious" | "approve_new_phish_malicious" => Some(Self::ApproveMalicious),
            "reject" | "reject_new_phish" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Path segment of the transition endpoint.
    pub fn verb(self) -> &'static str {
        match self {
            Self::ApproveSuspicious | Self::ApproveMalicious => "approve",
            Self::Reject => "reject",
        }
    }

    /// Classification sent with an approval.
    pub fn classification(self) -> Option<Classification> {
        match self {
            Self::ApproveSuspicious => Some(Classification::Suspicious),
            Self::ApproveMalicious => Some(Classification::Malicious),
            Self::Reject => None,
        }
    }

    /// Terminal status the report lands in.
    pub fn target_status(self) -> ReportStatus {
        match self {
            Self::ApproveSuspicious => ReportStatus::Suspicious,
            Self::ApproveMalicious => ReportStatus::Malicious,
            Self::Reject => ReportStatus::Rejected,
        }
    }
}

/// Identity of whoever pressed a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    pub id: String,
    pub tag: String,
}
