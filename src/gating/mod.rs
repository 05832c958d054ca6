//! Onboarding gates and top-level view selection
//!
//! Gates are checked in priority order: the community gate blocks
//! everything, the no-sources banner only informs, and the first-index gate
//! blocks searching until the first connected source finished indexing.

mod gates;
mod types;

pub use gates::Gates;
pub use types::{Banner, BaseView, Overlay, Screen, SearchBlocked};
