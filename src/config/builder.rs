//! Type-safe builder for `ClientConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that required fields are set before building a `ClientConfig`.

use crate::utils::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_INDEXING_QUIET_PERIOD, DEFAULT_POLL_INTERVAL,
    DEFAULT_RETRY_INTERVAL, DEFAULT_SEARCH_TIMEOUT, DEFAULT_STATUS_TIMEOUT,
    NOTIFICATION_CAPACITY, SEARCH_HISTORY_CAPACITY, SUGGESTION_LIMIT, normalize_base_url,
};
use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::types::ClientConfig;

// Type states for the builder
pub struct WithBaseUrl;
pub struct Complete;

pub struct ClientConfigBuilder<State = ()> {
    pub(crate) base_url: Option<String>,
    pub(crate) storage_dir: Option<PathBuf>,
    pub(crate) poll_interval: Duration,
    pub(crate) retry_interval: Duration,
    pub(crate) status_timeout: Duration,
    pub(crate) failure_threshold: u32,
    pub(crate) indexing_quiet_period: Duration,
    pub(crate) search_timeout: Option<Duration>,
    pub(crate) community_passphrase: Option<String>,
    pub(crate) history_capacity: usize,
    pub(crate) suggestion_limit: usize,
    pub(crate) notification_capacity: usize,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ClientConfigBuilder<()> {
    fn default() -> Self {
        Self {
            base_url: None,
            storage_dir: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            indexing_quiet_period: DEFAULT_INDEXING_QUIET_PERIOD,
            search_timeout: Some(DEFAULT_SEARCH_TIMEOUT),
            community_passphrase: None,
            history_capacity: SEARCH_HISTORY_CAPACITY,
            suggestion_limit: SUGGESTION_LIMIT,
            notification_capacity: NOTIFICATION_CAPACITY,
            _phantom: PhantomData,
        }
    }
}

impl ClientConfig {
    /// Create a builder for configuring a `ClientConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ClientConfigBuilder<()> {
        ClientConfigBuilder::default()
    }
}

impl ClientConfigBuilder<()> {
    pub fn base_url(self, url: impl Into<String>) -> ClientConfigBuilder<WithBaseUrl> {
        ClientConfigBuilder {
            base_url: Some(url.into()),
            storage_dir: self.storage_dir,
            poll_interval: self.poll_interval,
            retry_interval: self.retry_interval,
            status_timeout: self.status_timeout,
            failure_threshold: self.failure_threshold,
            indexing_quiet_period: self.indexing_quiet_period,
            search_timeout: self.search_timeout,
            community_passphrase: self.community_passphrase,
            history_capacity: self.history_capacity,
            suggestion_limit: self.suggestion_limit,
            notification_capacity: self.notification_capacity,
            _phantom: PhantomData,
        }
    }
}

impl ClientConfigBuilder<WithBaseUrl> {
    pub fn storage_dir(self, dir: impl Into<PathBuf>) -> ClientConfigBuilder<Complete> {
        ClientConfigBuilder {
            base_url: self.base_url,
            storage_dir: Some(dir.into()),
            poll_interval: self.poll_interval,
            retry_interval: self.retry_interval,
            status_timeout: self.status_timeout,
            failure_threshold: self.failure_threshold,
            indexing_quiet_period: self.indexing_quiet_period,
            search_timeout: self.search_timeout,
            community_passphrase: self.community_passphrase,
            history_capacity: self.history_capacity,
            suggestion_limit: self.suggestion_limit,
            notification_capacity: self.notification_capacity,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl ClientConfigBuilder<Complete> {
    pub fn build(self) -> Result<ClientConfig> {
        let raw_url = self
            .base_url
            .ok_or_else(|| anyhow!("base_url is required"))?;
        let base_url: Url = normalize_base_url(&raw_url)?;

        let storage_dir = self
            .storage_dir
            .ok_or_else(|| anyhow!("storage_dir is required"))?;

        if self.failure_threshold == 0 {
            return Err(anyhow!("failure_threshold must be at least 1"));
        }
        if self.history_capacity == 0 {
            return Err(anyhow!("history_capacity must be at least 1"));
        }
        if self.notification_capacity == 0 {
            return Err(anyhow!("notification_capacity must be at least 1"));
        }
        if self.status_timeout.is_zero() {
            return Err(anyhow!("status_timeout must be non-zero"));
        }

        let community_passphrase = self
            .community_passphrase
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(ClientConfig {
            base_url,
            storage_dir,
            poll_interval: self.poll_interval,
            retry_interval: self.retry_interval,
            status_timeout: self.status_timeout,
            failure_threshold: self.failure_threshold,
            indexing_quiet_period: self.indexing_quiet_period,
            search_timeout: self.search_timeout,
            community_passphrase,
            history_capacity: self.history_capacity,
            suggestion_limit: self.suggestion_limit,
            notification_capacity: self.notification_capacity,
        })
    }
}
