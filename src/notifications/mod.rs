//! User-visible notification system
//!
//! This module provides a broadcast bus for fire-and-forget notifications
//! (the toast equivalent of a graphical front end), with delivery counters,
//! filtered receivers and shutdown signalling.

// Sub-modules
pub mod bus;
pub mod config;
pub mod errors;
pub mod stats;
pub mod streaming;
pub mod types;

// Re-exports for public API
pub use bus::NotificationBus;
pub use config::NotificationBusConfig;
pub use errors::NotificationError;
pub use stats::{NotificationStats, NotificationTally};
pub use streaming::FilteredReceiver;
pub use types::{Notification, NotificationKind, Severity};
