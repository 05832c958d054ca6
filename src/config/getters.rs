//! Getter methods for `ClientConfig`
//!
//! This module provides the accessor methods for retrieving configuration
//! values from a `ClientConfig` instance.

use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::utils::LOCAL_STORE_FILENAME;

use super::types::ClientConfig;

impl ClientConfig {
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Location of the persisted local store file
    #[must_use]
    pub fn local_store_path(&self) -> PathBuf {
        self.storage_dir.join(LOCAL_STORE_FILENAME)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    #[must_use]
    pub fn status_timeout(&self) -> Duration {
        self.status_timeout
    }

    #[must_use]
    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    #[must_use]
    pub fn indexing_quiet_period(&self) -> Duration {
        self.indexing_quiet_period
    }

    #[must_use]
    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout
    }

    #[must_use]
    pub fn community_passphrase(&self) -> Option<&str> {
        self.community_passphrase.as_deref()
    }

    #[must_use]
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    #[must_use]
    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }

    #[must_use]
    pub fn notification_capacity(&self) -> usize {
        self.notification_capacity
    }
}
