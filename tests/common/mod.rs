//! Test utilities shared by the integration tests

#![allow(dead_code)]

use anyhow::Result;
use mockito::{Server, ServerGuard};
use parking_lot::Mutex;
use search_sync_client::api::{
    AddDataSourceRequest, ApiError, ConnectedDataSource, DataSourceApi, DataSourceType,
    IndexLocation, SearchBackend, SearchResult, ServerStatus, StatusSource,
};
use search_sync_client::config::ClientConfig;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

/// Creates a temporary directory for test state
pub fn create_test_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Starts a mock HTTP server
pub async fn setup_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// API root of a mock server, as passed to the config builder
pub fn api_url(server: &ServerGuard) -> String {
    format!("{}/api/v1", server.url())
}

/// Config with short timings, suitable for paused-clock tests
pub fn test_config(dir: &TempDir, passphrase: Option<&str>) -> ClientConfig {
    ClientConfig::builder()
        .base_url("http://localhost:8000/api/v1")
        .storage_dir(dir.path())
        .poll_interval(Duration::from_secs(1))
        .retry_interval(Duration::from_secs(1))
        .status_timeout(Duration::from_secs(3))
        .failure_threshold(5)
        .indexing_quiet_period(Duration::from_secs(10))
        .community_passphrase(passphrase.map(str::to_string))
        .build()
        .unwrap()
}

/// One scripted answer of the status endpoint
#[derive(Debug, Clone, Copy)]
pub enum StatusReply {
    Ok(ServerStatus),
    Fail(u16),
    /// Never answers; only a timeout ends the poll
    Hang,
}

/// In-memory backend with scripted answers
///
/// Status replies are consumed in order; once the script is exhausted the
/// last reply repeats.
pub struct ScriptedBackend {
    status_script: Mutex<VecDeque<StatusReply>>,
    last_status: Mutex<StatusReply>,
    pub status_calls: AtomicUsize,
    results: Mutex<HashMap<String, Vec<SearchResult>>>,
    failing_queries: Mutex<HashSet<String>>,
    held_queries: Mutex<HashSet<String>>,
    release: Notify,
    pub search_calls: Mutex<Vec<String>>,
    connected: Mutex<Vec<ConnectedDataSource>>,
    next_id: AtomicI64,
    add_failure: Mutex<Option<String>>,
    remove_failure: Mutex<Option<String>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            status_script: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(StatusReply::Ok(ServerStatus::default())),
            status_calls: AtomicUsize::new(0),
            results: Mutex::new(HashMap::new()),
            failing_queries: Mutex::new(HashSet::new()),
            held_queries: Mutex::new(HashSet::new()),
            release: Notify::new(),
            search_calls: Mutex::new(Vec::new()),
            connected: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            add_failure: Mutex::new(None),
            remove_failure: Mutex::new(None),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_status(&self, replies: impl IntoIterator<Item = StatusReply>) {
        self.status_script.lock().extend(replies);
    }

    pub fn with_results(self, query: &str, titles: &[&str]) -> Self {
        let results = titles
            .iter()
            .map(|title| SearchResult {
                title: Some((*title).to_string()),
                ..SearchResult::default()
            })
            .collect();
        self.results.lock().insert(query.to_string(), results);
        self
    }

    pub fn failing_query(self, query: &str) -> Self {
        self.failing_queries.lock().insert(query.to_string());
        self
    }

    /// Searches for `query` wait until `release()` is called
    pub fn hold_query(self, query: &str) -> Self {
        self.held_queries.lock().insert(query.to_string());
        self
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn with_connected(self, sources: &[(i64, &str)]) -> Self {
        *self.connected.lock() = sources
            .iter()
            .map(|(id, name)| ConnectedDataSource {
                id: *id,
                name: (*name).to_string(),
            })
            .collect();
        self
    }

    pub fn fail_adds(&self, message: &str) {
        *self.add_failure.lock() = Some(message.to_string());
    }

    pub fn fail_removes(&self, message: &str) {
        *self.remove_failure.lock() = Some(message.to_string());
    }

    pub fn searches(&self) -> Vec<String> {
        self.search_calls.lock().clone()
    }

    fn next_status(&self) -> StatusReply {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.status_script.lock().pop_front();
        match scripted {
            Some(reply) => {
                *self.last_status.lock() = reply;
                reply
            }
            None => *self.last_status.lock(),
        }
    }
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: message.to_string(),
    }
}

impl StatusSource for ScriptedBackend {
    async fn fetch_status(&self) -> Result<ServerStatus, ApiError> {
        match self.next_status() {
            StatusReply::Ok(status) => Ok(status),
            StatusReply::Fail(code) => Err(rejected(code, "Service unavailable")),
            StatusReply::Hang => std::future::pending().await,
        }
    }
}

impl SearchBackend for ScriptedBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        self.search_calls.lock().push(query.to_string());

        let held = self.held_queries.lock().contains(query);
        if held {
            self.release.notified().await;
        }

        if self.failing_queries.lock().contains(query) {
            return Err(rejected(500, "Search index unavailable"));
        }
        Ok(self.results.lock().get(query).cloned().unwrap_or_default())
    }
}

impl DataSourceApi for ScriptedBackend {
    async fn list_data_source_types(&self) -> Result<Vec<DataSourceType>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_connected_data_sources(&self) -> Result<Vec<ConnectedDataSource>, ApiError> {
        Ok(self.connected.lock().clone())
    }

    async fn add_data_source(&self, request: &AddDataSourceRequest) -> Result<i64, ApiError> {
        let failure = self.add_failure.lock().clone();
        if let Some(message) = failure {
            return Err(rejected(400, &message));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.connected.lock().push(ConnectedDataSource {
            id,
            name: request.name.clone(),
        });
        Ok(id)
    }

    async fn remove_data_source(&self, id: i64) -> Result<(), ApiError> {
        let failure = self.remove_failure.lock().clone();
        if let Some(message) = failure {
            return Err(rejected(500, &message));
        }
        self.connected.lock().retain(|source| source.id != id);
        Ok(())
    }

    async fn list_locations(
        &self,
        _source_type: &str,
        _config: &Value,
    ) -> Result<Vec<IndexLocation>, ApiError> {
        Ok(Vec::new())
    }
}
