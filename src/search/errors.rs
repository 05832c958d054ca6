//! Error types for search execution

use std::time::Duration;
use thiserror::Error;

use crate::api::ApiError;

/// Error types for search execution
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend rejected or failed the request
    #[error("Search request failed: {0}")]
    Backend(#[from] ApiError),

    /// No response within the configured search timeout
    #[error("Search timed out after {0:?}")]
    TimedOut(Duration),
}

impl SearchError {
    /// Check if retrying the same query may succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::Backend(e) => e.is_transient(),
            SearchError::TimedOut(_) => true,
        }
    }

    /// Text suitable for showing to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Backend(e) => e.user_message(),
            SearchError::TimedOut(timeout) => {
                format!("No response after {} seconds", timeout.as_secs())
            }
        }
    }
}
