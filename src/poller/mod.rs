//! Remote status polling
//!
//! Keeps the client's view of backend reachability and indexing progress
//! eventually consistent with the backend. The transition logic lives in
//! the pure [`PollerState`] machine; [`StatusPoller`] drives it from a
//! cancellable tokio task and publishes each result as a whole
//! [`StatusSnapshot`].

mod state;
mod task;
mod types;

pub use state::PollerState;
pub use task::{PollerHandle, StatusPoller};
pub use types::{ConnectionState, IndexingPhase, PollerSettings, StatusSnapshot, Visibility};
