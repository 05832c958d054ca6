//! Poll result state machine
//!
//! Pure transition logic for connection state and indexing phase. Every
//! method takes the current instant explicitly so transitions are a
//! function of their inputs and can be tested without a clock.
//!
//! Connection tracking follows a debounce rule:
//! - A success immediately restores `Up`
//! - `Down` is only reported after `failure_threshold` consecutive failures
//!   while the client is in the foreground

use chrono::Utc;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::Instant;

use crate::api::{ApiError, ServerStatus};
use crate::notifications::Notification;

use super::types::{ConnectionState, IndexingPhase, StatusSnapshot};

/// Connection and indexing state accumulated across polls
#[derive(Debug, Clone)]
pub struct PollerState {
    connection: ConnectionState,
    phase: IndexingPhase,
    last_status: Option<ServerStatus>,
    /// Last poll that showed indexing activity
    last_activity_at: Option<Instant>,
    last_poll_at: Option<chrono::DateTime<Utc>>,
    consecutive_failures: u32,
    failure_threshold: u32,
    quiet_period: Duration,
}

impl PollerState {
    /// Create a state that assumes the server is up and idle
    ///
    /// # Arguments
    /// * `failure_threshold` - Consecutive failures before reporting `Down`
    /// * `quiet_period` - Inactivity required before indexing counts as finished
    #[must_use]
    pub fn new(failure_threshold: u32, quiet_period: Duration) -> Self {
        Self {
            connection: ConnectionState::Up,
            phase: IndexingPhase::Idle,
            last_status: None,
            last_activity_at: None,
            last_poll_at: None,
            consecutive_failures: 0,
            failure_threshold: failure_threshold.max(1),
            quiet_period,
        }
    }

    #[must_use]
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    #[must_use]
    pub fn phase(&self) -> IndexingPhase {
        self.phase
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Apply a successful poll
    ///
    /// Returns the notifications caused by this poll, at most one per
    /// transition.
    pub fn on_success(
        &mut self,
        status: ServerStatus,
        now: Instant,
        foreground: bool,
    ) -> Vec<Notification> {
        let mut notifications = Vec::new();

        self.consecutive_failures = 0;
        self.last_poll_at = Some(Utc::now());

        if self.connection == ConnectionState::Down {
            self.connection = ConnectionState::Up;
            info!("Backend reachable again");
            if foreground {
                notifications.push(Notification::server_online());
            }
        }

        match classify_activity(self.last_status.as_ref(), &status) {
            Some(observed) => {
                self.last_activity_at = Some(now);
                let next = match (self.phase, observed) {
                    // Queue-only readings do not demote a running index
                    (IndexingPhase::Indexing, IndexingPhase::Preparing) => IndexingPhase::Indexing,
                    (_, observed) => observed,
                };
                if next != self.phase {
                    debug!("Indexing phase {:?} -> {:?} ({status:?})", self.phase, next);
                    self.phase = next;
                }
            }
            None => {
                if self.phase.is_active() && self.quiet_period_elapsed(now) {
                    info!("Indexing finished ({} documents indexed)", status.docs_indexed);
                    self.phase = IndexingPhase::Idle;
                    notifications.push(Notification::indexing_finished());
                }
            }
        }

        self.last_status = Some(status);
        notifications
    }

    /// Apply a failed poll
    ///
    /// Counts the failure. Once `failure_threshold` consecutive failures
    /// accumulate in the foreground the counter resets and, if the server
    /// was considered up, it flips to `Down` with a single notification.
    pub fn on_failure(&mut self, error: &ApiError, foreground: bool) -> Vec<Notification> {
        let mut notifications = Vec::new();

        self.consecutive_failures += 1;
        self.last_poll_at = Some(Utc::now());

        debug!(
            "Status poll failed ({}/{}): {error}",
            self.consecutive_failures, self.failure_threshold
        );

        if self.consecutive_failures >= self.failure_threshold && foreground {
            if self.connection == ConnectionState::Up {
                self.connection = ConnectionState::Down;
                warn!(
                    "Backend unreachable after {} consecutive failed polls. Last error: {error}",
                    self.consecutive_failures
                );
                notifications.push(Notification::server_down());
            }
            self.consecutive_failures = 0;
        }

        notifications
    }

    /// Current state as a complete snapshot
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            connection: self.connection,
            phase: self.phase,
            status: self.last_status,
            last_poll_at: self.last_poll_at,
            consecutive_failures: self.consecutive_failures,
        }
    }

    fn quiet_period_elapsed(&self, now: Instant) -> bool {
        match self.last_activity_at {
            Some(at) => now.saturating_duration_since(at) > self.quiet_period,
            None => true,
        }
    }
}

/// Classify a reading as indexing activity
///
/// Returns `Some(Indexing)` when documents are in flight or the indexed
/// count grew since a previous non-zero reading, `Some(Preparing)` when
/// documents are only queued, and `None` when nothing is happening.
///
/// Growth from zero is not activity, so a source indexed entirely between
/// two polls never produces `IndexingFinished`. `Gates::on_status` lifts
/// the first-index gate in that case.
fn classify_activity(
    previous: Option<&ServerStatus>,
    current: &ServerStatus,
) -> Option<IndexingPhase> {
    let indexed_grew = previous.is_some_and(|prev| {
        prev.docs_indexed > 0 && current.docs_indexed > prev.docs_indexed
    });

    if current.docs_in_indexing > 0 || indexed_grew {
        Some(IndexingPhase::Indexing)
    } else if current.docs_left_to_index > 0 {
        Some(IndexingPhase::Preparing)
    } else {
        None
    }
}
