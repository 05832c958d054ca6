//! Core NotificationBus struct definition and constructors

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::{Notify, broadcast};

use crate::notifications::config::NotificationBusConfig;
use crate::notifications::stats::NotificationStats;
use crate::notifications::types::Notification;

/// Broadcast bus for user-visible notifications
#[derive(Debug, Clone)]
pub struct NotificationBus {
    pub(super) sender: broadcast::Sender<Notification>,
    pub(super) config: Arc<NotificationBusConfig>,
    pub(super) stats: Arc<NotificationStats>,
    pub(super) shutdown: Arc<Notify>,
    pub(super) shutdown_flag: Arc<AtomicBool>,
}

impl NotificationBus {
    /// Create a new bus buffering up to `capacity` notifications per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_config(NotificationBusConfig { capacity })
    }

    /// Create a new bus with custom configuration
    #[must_use]
    pub fn with_config(config: NotificationBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.capacity.max(1));
        Self {
            sender,
            config: Arc::new(config),
            stats: Arc::new(NotificationStats::default()),
            shutdown: Arc::new(Notify::new()),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &NotificationBusConfig {
        &self.config
    }

    /// Delivery counters shared by all clones of this bus
    #[must_use]
    pub fn stats(&self) -> &NotificationStats {
        &self.stats
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::with_config(NotificationBusConfig::default())
    }
}
