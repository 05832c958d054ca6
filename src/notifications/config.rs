//! Configuration for the notification bus

use crate::utils::NOTIFICATION_CAPACITY;

/// Configuration for the notification bus
#[derive(Debug, Clone)]
pub struct NotificationBusConfig {
    /// Notifications buffered per subscriber; the oldest are dropped when
    /// a subscriber falls further behind
    pub capacity: usize,
}

impl Default for NotificationBusConfig {
    fn default() -> Self {
        Self {
            capacity: NOTIFICATION_CAPACITY,
        }
    }
}
