//! Notification bus implementation
//!
//! The bus wraps a `tokio::sync::broadcast` channel: every subscriber sees
//! every notification published after it subscribed.

// Core struct and constructors
mod core;

// Functionality implementations
mod publishing;
mod shutdown;
mod subscription;

// Re-export the main type
pub use self::core::NotificationBus;
