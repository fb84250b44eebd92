//! Fetch Error Types
//!
//! Everything that can go wrong between issuing the poll and holding a
//! parsed snapshot. Shared by the native client and the browser front end,
//! so variants carry messages rather than transport-specific error types.

use thiserror::Error;

/// Errors that can occur while fetching a dashboard snapshot
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection could not be established
    #[error("Dashboard API unavailable: {0}")]
    Unavailable(String),

    /// No response within the request timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Malformed JSON or missing required fields
    #[error("Invalid dashboard payload: {0}")]
    Parse(String),
}

impl FetchError {
    /// Short machine-readable code, used in structured logs
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Unavailable(_) => "UNAVAILABLE",
            FetchError::Timeout => "TIMEOUT",
            FetchError::Network(_) => "NETWORK",
            FetchError::Status { .. } => "HTTP_STATUS",
            FetchError::Parse(_) => "PARSE",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
