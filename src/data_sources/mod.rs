//! Data-source registry
//!
//! Client-side view of the backend's connected integrations, with
//! optimistic add/remove that rolls back when the backend refuses.

mod registry;
mod types;

pub use registry::DataSourceRegistry;
pub use types::{AddedSource, SourceEntry};
