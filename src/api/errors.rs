//! Error types for backend requests

use std::time::Duration;
use thiserror::Error;

/// Result type alias for backend requests
pub type ApiResult<T> = Result<T, ApiError>;

/// Error types for backend requests
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete within the caller's deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS or protocol failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    ///
    /// `message` is the backend-provided explanation.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// An endpoint URL could not be built
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The client could not be constructed
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether retrying the same request later may succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Timeout(_) => true,
            ApiError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            ApiError::Decode(_) | ApiError::Url(_) | ApiError::Config(_) => false,
        }
    }

    /// Text suitable for showing to the user
    ///
    /// For backend rejections this is the backend's own message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let server = ApiError::Status {
            status: 503,
            message: "indexer restarting".to_string(),
        };
        assert!(server.is_transient());
        assert_eq!(server.user_message(), "indexer restarting");

        let throttled = ApiError::Status {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(throttled.is_transient());

        let rejected = ApiError::Status {
            status: 400,
            message: "missing field".to_string(),
        };
        assert!(!rejected.is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        assert!(ApiError::Timeout(Duration::from_secs(3)).is_transient());
        assert!(!ApiError::Decode("x".to_string()).is_transient());
    }
}
