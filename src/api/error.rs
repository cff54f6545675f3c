//! Repository API errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 404 from the API.
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected structure.
    #[error("unexpected response: {0}")]
    Shape(String),

    /// 403 with an exhausted rate-limit budget.
    #[error("API rate limit exceeded{}", reset_suffix(*.reset))]
    RateLimit {
        /// Epoch seconds at which the budget resets.
        reset: Option<u64>,
    },

    /// Transport failure or other non-success status.
    #[error("request failed: {0}")]
    Request(String),

    /// Body could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
}

fn reset_suffix(reset: Option<u64>) -> String {
    match reset {
        Some(epoch) => format!(" (resets at {epoch})"),
        None => String::new(),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}
