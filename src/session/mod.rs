//! Client session
//!
//! `Session` owns every long-lived component of the client and is the only
//! place where they are wired together.

mod core;
mod errors;

pub use self::core::Session;
pub use errors::SubmitError;
