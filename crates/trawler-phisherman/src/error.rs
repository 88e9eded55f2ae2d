use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReputationError>;

/// Failures talking to the reputation backend. None of them are retried
/// here; the caller decides what the user sees.
#[derive(Debug, Error)]
pub enum ReputationError {
    /// Transport failure or a 5xx answer.
    #[error("reputation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The referenced record does not exist (HTTP 404).
    #[error("record not found")]
    NotFound,

    /// Any other non-success answer, e.g. a domain that does not resolve.
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a payload we cannot interpret.
    #[error("unexpected backend payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ReputationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::BackendUnavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ReputationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
