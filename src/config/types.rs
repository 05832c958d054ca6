//! Core configuration types for the search client
//!
//! This module contains the main `ClientConfig` struct that defines the
//! connection, polling, search and persistence parameters of a session.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration struct for a search client session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API root.
    ///
    /// **INVARIANT:** Always has a scheme, a host and a path ending in `/`
    /// (normalized in builder), so endpoint joins keep the API prefix.
    pub(crate) base_url: Url,

    /// Directory holding the persisted local store
    pub(crate) storage_dir: PathBuf,

    /// Delay between successful status polls
    ///
    /// Default: 1 second
    pub(crate) poll_interval: Duration,

    /// Delay before the next poll after a failed one
    ///
    /// Default: 1 second
    pub(crate) retry_interval: Duration,

    /// Timeout for a single status request
    ///
    /// Default: 3 seconds
    pub(crate) status_timeout: Duration,

    /// Consecutive failed polls before the server is reported down
    ///
    /// Default: 5
    pub(crate) failure_threshold: u32,

    /// Quiet time after the last indexing activity before indexing is
    /// reported finished
    ///
    /// Default: 10 seconds
    pub(crate) indexing_quiet_period: Duration,

    /// Timeout for a single search request. `None` relies on the
    /// transport default.
    ///
    /// Default: 30 seconds
    pub(crate) search_timeout: Option<Duration>,

    /// Passphrase accepted by the community gate. When unset the gate
    /// can only be skipped.
    pub(crate) community_passphrase: Option<String>,

    /// Maximum remembered queries
    ///
    /// Default: 100
    pub(crate) history_capacity: usize,

    /// Maximum autocomplete suggestions per prefix
    ///
    /// Default: 6
    pub(crate) suggestion_limit: usize,

    /// Buffered notifications per subscriber
    ///
    /// Default: 256
    pub(crate) notification_capacity: usize,
}
