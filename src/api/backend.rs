//! Backend seams
//!
//! Each consumer depends on the narrowest trait it needs. `BackendClient`
//! implements all of them.

use serde_json::Value;
use std::future::Future;

use super::errors::ApiError;
use super::types::{
    AddDataSourceRequest, ConnectedDataSource, DataSourceType, IndexLocation, SearchResult,
    ServerStatus,
};

/// Source of liveness and indexing counters, polled by the status poller
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status(&self) -> impl Future<Output = Result<ServerStatus, ApiError>> + Send;
}

/// Executes search queries
pub trait SearchBackend: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>, ApiError>> + Send;
}

/// Manages the backend's data-source integrations
pub trait DataSourceApi: Send + Sync + 'static {
    fn list_data_source_types(
        &self,
    ) -> impl Future<Output = Result<Vec<DataSourceType>, ApiError>> + Send;

    fn list_connected_data_sources(
        &self,
    ) -> impl Future<Output = Result<Vec<ConnectedDataSource>, ApiError>> + Send;

    /// Connect a new source, returning its backend id
    fn add_data_source(
        &self,
        request: &AddDataSourceRequest,
    ) -> impl Future<Output = Result<i64, ApiError>> + Send;

    fn remove_data_source(&self, id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Enumerate selectable sub-locations of a source type for `config`
    fn list_locations(
        &self,
        source_type: &str,
        config: &Value,
    ) -> impl Future<Output = Result<Vec<IndexLocation>, ApiError>> + Send;
}

/// Everything a session needs from the backend
pub trait Backend: StatusSource + SearchBackend + DataSourceApi {}

impl<T: StatusSource + SearchBackend + DataSourceApi> Backend for T {}
