//! Search execution
//!
//! Runs user queries against the backend, records them in the search
//! history and discards responses that a newer query has overtaken.

mod errors;
mod executor;
mod types;

pub use errors::SearchError;
pub use executor::SearchExecutor;
pub use types::{SearchOutcome, SearchResponse};
