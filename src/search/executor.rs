//! Query execution with last-submission-wins ordering

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::api::{SearchBackend, SearchResult};
use crate::history::SearchHistory;
use crate::notifications::{Notification, NotificationBus};

use super::errors::SearchError;
use super::types::{SearchOutcome, SearchResponse};

/// Executes searches and filters out stale responses
///
/// Every non-empty submission takes the next generation number. A response
/// is only applied if no later submission happened while it was in flight;
/// otherwise it is reported as `Superseded` and produces no notification.
pub struct SearchExecutor<B: SearchBackend> {
    backend: Arc<B>,
    history: Arc<SearchHistory>,
    bus: NotificationBus,
    generation: AtomicU64,
    timeout: Option<Duration>,
}

impl<B: SearchBackend> SearchExecutor<B> {
    #[must_use]
    pub fn new(
        backend: Arc<B>,
        history: Arc<SearchHistory>,
        bus: NotificationBus,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            backend,
            history,
            bus,
            generation: AtomicU64::new(0),
            timeout,
        }
    }

    /// Generation of the most recent submission, 0 before the first
    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether `generation` is still the newest submission
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    /// Submit `query`
    ///
    /// Whitespace-only queries are rejected without touching the history or
    /// the backend. Queries the backend answered are recorded in the
    /// history, superseded ones included.
    ///
    /// # Errors
    /// Returns the request failure when this submission is still the newest
    /// one; a failure of a superseded submission is reported as `Superseded`.
    pub async fn execute(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::Rejected);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let start = Instant::now();
        let result = self.request(query).await;
        let duration = start.elapsed();

        if result.is_ok() {
            self.history.record(query);
        }

        if !self.is_current(generation) {
            tracing::debug!(
                query = %query,
                generation,
                latest = self.latest_generation(),
                "Discarding superseded search response"
            );
            return Ok(SearchOutcome::Superseded { generation });
        }

        match result {
            Ok(results) => {
                tracing::debug!(
                    query = %query,
                    generation,
                    results = results.len(),
                    duration_ms = duration.as_millis(),
                    "Search completed"
                );
                if results.is_empty() {
                    self.bus.notify(Notification::no_results(query));
                }
                Ok(SearchOutcome::Completed(SearchResponse {
                    query: query.to_string(),
                    results,
                    duration,
                    generation,
                }))
            }
            Err(e) => {
                tracing::error!(
                    query = %query,
                    generation,
                    duration_ms = duration.as_millis(),
                    error = %e,
                    "Search failed"
                );
                self.bus
                    .notify(Notification::search_failed(query, e.user_message()));
                Err(e)
            }
        }
    }

    async fn request(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.backend.search(query))
                .await
                .map_err(|_| SearchError::TimedOut(timeout))?
                .map_err(SearchError::from),
            None => Ok(self.backend.search(query).await?),
        }
    }
}
