//! Publishing operations for the NotificationBus

use std::sync::atomic::Ordering;

use crate::notifications::errors::NotificationError;
use crate::notifications::types::Notification;

use super::core::NotificationBus;

impl NotificationBus {
    /// Publish a notification to all subscribers
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of subscribers that will receive it
    /// * `Err(NotificationError::NoSubscribers)` - Nobody is listening
    /// * `Err(NotificationError::Shutdown)` - The bus has been shut down
    pub fn publish(&self, notification: Notification) -> Result<usize, NotificationError> {
        if self.shutdown_flag.load(Ordering::SeqCst) {
            self.stats.record_late();
            return Err(NotificationError::Shutdown);
        }

        let severity = notification.severity();
        match self.sender.send(notification) {
            Ok(count) => {
                self.stats.record_delivered(severity);
                Ok(count)
            }
            Err(_) => {
                self.stats.record_unheard();
                Err(NotificationError::NoSubscribers)
            }
        }
    }

    /// Fire-and-forget publish
    ///
    /// Notifications are advisory: a missing audience or a shut-down bus is
    /// logged at debug level and otherwise ignored.
    pub fn notify(&self, notification: Notification) {
        let kind = notification.kind.clone();
        if let Err(e) = self.publish(notification) {
            log::debug!("Notification {kind:?} not delivered: {e}");
        }
    }
}
