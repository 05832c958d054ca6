//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::time::Duration;

use super::builder::ClientConfigBuilder;

impl<State> ClientConfigBuilder<State> {
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Set the timeout applied to each status request
    ///
    /// A poll that does not complete within this window counts as a
    /// failed poll, so a hung backend still drives the server-down
    /// debounce instead of stalling the loop.
    #[must_use]
    pub fn status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    /// Set how many consecutive failed polls are tolerated before the
    /// server is reported down
    ///
    /// # Example
    /// ```rust
    /// # use search_sync_client::config::ClientConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = ClientConfig::builder()
    ///     .base_url("http://localhost:8000/api/v1")
    ///     .storage_dir("./state")
    ///     .failure_threshold(3)
    ///     .build()?;
    /// assert_eq!(config.failure_threshold(), 3);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    #[must_use]
    pub fn indexing_quiet_period(mut self, period: Duration) -> Self {
        self.indexing_quiet_period = period;
        self
    }

    /// Set the search request timeout, or `None` to rely on the transport
    #[must_use]
    pub fn search_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.search_timeout = timeout;
        self
    }

    #[must_use]
    pub fn community_passphrase(mut self, passphrase: Option<String>) -> Self {
        self.community_passphrase = passphrase;
        self
    }

    #[must_use]
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    #[must_use]
    pub fn notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }
}
