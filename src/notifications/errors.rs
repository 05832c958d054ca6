//! Error types for notification bus operations

/// Error types for notification bus operations
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// No active subscribers when publishing
    #[error("No active subscribers")]
    NoSubscribers,

    /// Receiver couldn't keep up, missed messages
    #[error("Receiver lagged behind, missed {0} notifications")]
    ReceiverLagged(u64),

    /// Bus or receiver was closed
    #[error("Notification bus shutdown")]
    Shutdown,
}
