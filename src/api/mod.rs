//! Backend HTTP API
//!
//! Typed client for the search/indexing backend plus the traits the
//! poller, search executor and data-source registry depend on, so each of
//! them can run against a scripted backend in tests.

pub mod backend;
pub mod client;
pub mod errors;
pub mod types;

pub use backend::{Backend, DataSourceApi, SearchBackend, StatusSource};
pub use client::BackendClient;
pub use errors::{ApiError, ApiResult};
pub use types::{
    AddDataSourceRequest, ConfigField, ConnectedDataSource, DataSourceType, HtmlInputType,
    IndexLocation, SearchResult, ServerStatus, TextPart,
};
