//! Delivery counters of the notification bus

use std::sync::atomic::{AtomicU64, Ordering};

use super::types::Severity;

/// What happened to published notifications, by severity
///
/// Counters only grow. `unheard` counts notifications nobody was
/// subscribed to; `late` counts those published after shutdown.
#[derive(Debug, Default)]
pub struct NotificationStats {
    success: AtomicU64,
    info: AtomicU64,
    warning: AtomicU64,
    error: AtomicU64,
    unheard: AtomicU64,
    late: AtomicU64,
}

impl NotificationStats {
    pub(crate) fn record_delivered(&self, severity: Severity) {
        let counter = match severity {
            Severity::Success => &self.success,
            Severity::Info => &self.info,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unheard(&self) {
        self.unheard.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_late(&self) {
        self.late.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn tally(&self) -> NotificationTally {
        NotificationTally {
            success: self.success.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            warning: self.warning.load(Ordering::Relaxed),
            error: self.error.load(Ordering::Relaxed),
            unheard: self.unheard.load(Ordering::Relaxed),
            late: self.late.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`NotificationStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationTally {
    pub success: u64,
    pub info: u64,
    pub warning: u64,
    pub error: u64,
    pub unheard: u64,
    pub late: u64,
}

impl NotificationTally {
    /// Notifications that reached at least one subscriber
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.success + self.info + self.warning + self.error
    }

    /// Delivered warnings and errors
    #[must_use]
    pub fn problems(&self) -> u64 {
        self.warning + self.error
    }
}
