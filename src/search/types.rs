use serde::Serialize;
use std::time::Duration;

use crate::api::SearchResult;

/// A completed search whose results should be shown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// The trimmed query that was sent
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Wall time from submission to response
    pub duration: Duration,
    /// Submission sequence number; higher is newer
    pub generation: u64,
}

impl SearchResponse {
    /// Elapsed time in seconds, as shown next to the result count
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// What happened to a submitted query
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was empty after trimming; nothing was sent
    Rejected,
    /// A newer query was submitted before this one completed
    Superseded { generation: u64 },
    /// The response belongs to the newest query
    Completed(SearchResponse),
}

impl SearchOutcome {
    #[must_use]
    pub fn response(&self) -> Option<&SearchResponse> {
        match self {
            SearchOutcome::Completed(response) => Some(response),
            _ => None,
        }
    }
}
