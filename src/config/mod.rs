//! Configuration module for the search client
//!
//! This module provides the `ClientConfig` struct and its type-safe builder
//! for configuring the backend connection, polling cadence, gating and
//! local persistence with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{ClientConfigBuilder, Complete, WithBaseUrl};
pub use types::ClientConfig;
