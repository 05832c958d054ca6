//! Durable client-local key/value storage
//!
//! This module provides `LocalStore`, the persisted counterpart of browser
//! local storage: a single JSON document of keyed values written atomically
//! on every mutation. Higher-level components (history, gating, client
//! identity) keep their durable state here under the keys in [`keys`].

pub mod errors;
pub mod local_store;

pub use errors::StoreError;
pub use local_store::LocalStore;

/// Well-known keys of the local store
pub mod keys {
    /// Durable client identifier sent with every backend request
    pub const CLIENT_ID: &str = "uuid";
    /// Set once the community gate has been passed or skipped
    pub const COMMUNITY_GATE: &str = "discord_key";
    /// Name of the data source whose first indexing is still pending
    pub const FIRST_TIME_INDEXING: &str = "first_time_indexing";
    /// Recent search queries, most recent first
    pub const SEARCH_HISTORY: &str = "searchHistory";
}
