//! Shutdown operations for the NotificationBus

use std::sync::atomic::Ordering;

use crate::notifications::types::Notification;

use super::core::NotificationBus;

impl NotificationBus {
    /// Signal shutdown to all subscribers
    ///
    /// Publishes a final `Shutdown` notification, then refuses further
    /// publishes and wakes every `wait_for_shutdown` caller. Idempotent;
    /// all clones share the same signal.
    pub fn shutdown(&self) {
        if self.shutdown_flag.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.publish(Notification::shutdown());
        self.shutdown_flag.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
        log::debug!("Notification bus shutdown signaled");
    }

    /// Wait until `shutdown()` has been called on this bus or a clone
    ///
    /// Returns immediately when shutdown already happened.
    pub async fn wait_for_shutdown(&self) {
        let notified = self.shutdown.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_shutdown() {
            return;
        }
        notified.await;
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::SeqCst)
    }
}
