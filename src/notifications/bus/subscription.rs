//! Subscription operations for the NotificationBus

use tokio::sync::broadcast;

use crate::notifications::streaming::FilteredReceiver;
use crate::notifications::types::Notification;

use super::core::NotificationBus;

impl NotificationBus {
    /// Subscribe to all notifications published from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Number of live receivers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }

    /// Subscribe to the notifications for which `filter` returns true
    pub fn subscribe_filtered<F>(&self, filter: F) -> FilteredReceiver<F>
    where
        F: Fn(&Notification) -> bool + Send + Sync + 'static,
    {
        FilteredReceiver::new(self.subscribe(), filter)
    }
}
