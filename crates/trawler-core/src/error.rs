use thiserror::Error;

use trawler_phisherman::ReputationError;

use crate::surface::SurfaceError;

/// Bad user input. Always shown to the user, never escalated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no URL provided")]
    MissingInput,

    #[error("not a valid http(s) URL")]
    InvalidUrl,

    #[error("'{0}' is not a valid domain")]
    InvalidDomain(String),
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput | Self::InvalidUrl => "🚫 Invalid URL provided".to_string(),
            Self::InvalidDomain(_) => {
                "🚫 Domain validation failed. Please check provided URL".to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum TrawlerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("reputation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("record no longer exists")]
    NotFound,

    #[error("backend rejected request: {0}")]
    Rejected(String),

    #[error("chat platform error: {0}")]
    Platform(#[from] SurfaceError),
}

impl From<ReputationError> for TrawlerError {
    fn from(e: ReputationError) -> Self {
        match e {
            ReputationError::BackendUnavailable(msg) => Self::BackendUnavailable(msg),
            ReputationError::Decode(msg) => Self::BackendUnavailable(msg),
            ReputationError::NotFound => Self::NotFound,
            ReputationError::Rejected { message, .. } => Self::Rejected(message),
        }
    }
}

impl TrawlerError {
    /// The single line the initiating user sees for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(v) => v.user_message(),
            Self::Rejected(msg) if msg.contains("could not be resolved to a valid IPv4/IPv6 address") => {
                "❌ The domain could not be resolved to a valid IPv4/IPv6 address. It won't be processed any further."
                    .to_string()
            }
            Self::NotFound => "⚠️ That report no longer exists.".to_string(),
            Self::BackendUnavailable(_) | Self::Rejected(_) | Self::Platform(_) => {
                "❌ An error occurred, please try again.".to_string()
            }
        }
    }
}
