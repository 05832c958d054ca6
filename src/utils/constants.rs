//! Shared configuration constants for the search client
//!
//! Default values used by `ClientConfig` and the components it configures,
//! kept in one place to avoid magic numbers across the codebase.

use std::time::Duration;

/// Default backend API root
///
/// Matches the development layout of the backend, which serves its API
/// under `/api/v1` on port 8000.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Delay between successful status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Delay before retrying after a failed status poll
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on a single status request
///
/// Keeps a hung backend from stalling the polling loop.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Consecutive failed polls before the server is reported down
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// Quiet time after the last observed indexing activity before
/// indexing is considered finished
pub const DEFAULT_INDEXING_QUIET_PERIOD: Duration = Duration::from_secs(10);

/// Upper bound on a single search request
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of remembered search queries
pub const SEARCH_HISTORY_CAPACITY: usize = 100;

/// Maximum number of autocomplete suggestions returned per prefix
pub const SUGGESTION_LIMIT: usize = 6;

/// Buffered notifications per subscriber before the oldest are dropped
pub const NOTIFICATION_CAPACITY: usize = 256;

/// File name of the persisted local store inside the storage directory
pub const LOCAL_STORE_FILENAME: &str = "local_store.json";

/// Request header carrying the durable client identifier
pub const CLIENT_ID_HEADER: &str = "uuid";
