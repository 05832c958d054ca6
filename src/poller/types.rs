use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::api::ServerStatus;
use crate::config::ClientConfig;

/// Backend reachability as seen by the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    #[default]
    Up,
    Down,
}

/// Indexing activity derived from consecutive status readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexingPhase {
    /// No activity seen for longer than the quiet period
    #[default]
    Idle,
    /// Documents are queued but none are being processed yet
    Preparing,
    /// Documents are being processed
    Indexing,
}

impl IndexingPhase {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, IndexingPhase::Preparing | IndexingPhase::Indexing)
    }
}

/// Complete poller state published after every cycle
///
/// Always replaced as a whole; consumers never observe a mix of fields
/// from different polls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub connection: ConnectionState,
    pub phase: IndexingPhase,
    /// Counters from the most recent successful poll
    pub status: Option<ServerStatus>,
    /// Completion time of the most recent poll, successful or not
    pub last_poll_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl StatusSnapshot {
    #[must_use]
    pub fn is_server_down(&self) -> bool {
        self.connection == ConnectionState::Down
    }
}

/// Timing and threshold parameters of the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub status_timeout: Duration,
    pub failure_threshold: u32,
    pub quiet_period: Duration,
}

impl PollerSettings {
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            retry_interval: config.retry_interval(),
            status_timeout: config.status_timeout(),
            failure_threshold: config.failure_threshold(),
            quiet_period: config.indexing_quiet_period(),
        }
    }
}

/// Whether the user is currently looking at the client
///
/// Server-down notifications are held back while backgrounded. Clones
/// share the same flag.
#[derive(Debug, Clone)]
pub struct Visibility {
    foreground: Arc<AtomicBool>,
}

impl Visibility {
    #[must_use]
    pub fn new(foreground: bool) -> Self {
        Self {
            foreground: Arc::new(AtomicBool::new(foreground)),
        }
    }

    #[must_use]
    pub fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }

    pub fn set_foreground(&self, foreground: bool) {
        self.foreground.store(foreground, Ordering::SeqCst);
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::new(true)
    }
}
