//! Local search history for autocomplete
//!
//! Keeps a capped, most-recent-first list of executed queries in the local
//! store and derives prefix completions from it.

mod store;

pub use store::{SearchHistory, completions, push_front_dedup};
