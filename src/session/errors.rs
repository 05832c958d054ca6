//! Error types for session operations

use thiserror::Error;

use crate::gating::SearchBlocked;
use crate::search::SearchError;

/// Why a submitted search produced no results
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A gate refused the search before any request was made
    #[error(transparent)]
    Blocked(#[from] SearchBlocked),

    /// The request was made and failed
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl SubmitError {
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, SubmitError::Blocked(_))
    }
}
