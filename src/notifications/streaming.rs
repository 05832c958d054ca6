//! Filtered notification receivers

use std::sync::Arc;
use tokio::sync::broadcast;

use super::errors::NotificationError;
use super::types::Notification;

/// Receiver that only yields notifications passing `filter`
pub struct FilteredReceiver<F>
where
    F: Fn(&Notification) -> bool + Send + Sync + 'static,
{
    receiver: broadcast::Receiver<Notification>,
    filter: Arc<F>,
}

impl<F> FilteredReceiver<F>
where
    F: Fn(&Notification) -> bool + Send + Sync + 'static,
{
    pub fn new(receiver: broadcast::Receiver<Notification>, filter: F) -> Self {
        Self {
            receiver,
            filter: Arc::new(filter),
        }
    }

    /// Wait for the next notification that passes the filter
    ///
    /// # Returns
    /// * `Ok(Notification)` - The next matching notification
    /// * `Err(NotificationError)` - The bus closed or this receiver lagged
    pub async fn recv(&mut self) -> Result<Notification, NotificationError> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) => {
                    if (self.filter)(&notification) {
                        return Ok(notification);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(NotificationError::Shutdown);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Err(NotificationError::ReceiverLagged(skipped));
                }
            }
        }
    }
}
