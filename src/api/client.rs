//! `reqwest`-based backend client

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::utils::{CLIENT_ID_HEADER, endpoint_url};

use super::backend::{DataSourceApi, SearchBackend, StatusSource};
use super::errors::{ApiError, ApiResult};
use super::types::{
    AddDataSourceRequest, ConnectedDataSource, CreatedId, DataSourceType, IndexLocation,
    SearchResult, ServerStatus,
};

/// HTTP client for the search backend
///
/// Cloning is cheap and shares the connection pool. Every request carries
/// the durable client identifier header.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    client_id: Uuid,
}

impl BackendClient {
    /// Create a client for the API rooted at `base_url`
    ///
    /// `base_url` is expected to be normalized (path ending in `/`).
    pub fn new(base_url: Url, client_id: Uuid) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&client_id.to_string())
            .map_err(|e| ApiError::Config(format!("client id header: {e}")))?;
        headers.insert(CLIENT_ID_HEADER, value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            client_id,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn client_id(&self) -> Uuid {
        self.client_id
    }

    pub async fn fetch_status(&self) -> ApiResult<ServerStatus> {
        let url = endpoint_url(&self.base_url, "status")?;
        self.send_json(self.http.get(url)).await
    }

    pub async fn search(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        let url = endpoint_url(&self.base_url, "search")?;
        self.send_json(self.http.get(url).query(&[("query", query)]))
            .await
    }

    pub async fn list_data_source_types(&self) -> ApiResult<Vec<DataSourceType>> {
        let url = endpoint_url(&self.base_url, "data-sources/types")?;
        self.send_json(self.http.get(url)).await
    }

    pub async fn list_connected_data_sources(&self) -> ApiResult<Vec<ConnectedDataSource>> {
        let url = endpoint_url(&self.base_url, "data-sources/connected")?;
        self.send_json(self.http.get(url)).await
    }

    pub async fn add_data_source(&self, request: &AddDataSourceRequest) -> ApiResult<i64> {
        let url = endpoint_url(&self.base_url, "data-sources")?;
        let created: CreatedId = self.send_json(self.http.post(url).json(request)).await?;
        Ok(created.id())
    }

    pub async fn remove_data_source(&self, id: i64) -> ApiResult<()> {
        let url = self.segments_url(&["data-sources", &id.to_string()])?;
        let response = self.http.delete(url).send().await?;
        check_status(response).await.map(|_| ())
    }

    pub async fn list_locations(
        &self,
        source_type: &str,
        config: &Value,
    ) -> ApiResult<Vec<IndexLocation>> {
        let url = self.segments_url(&["data-sources", source_type, "list-locations"])?;
        self.send_json(self.http.post(url).json(config)).await
    }

    /// Build a URL from individually escaped path segments
    fn segments_url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Config(format!("base URL {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        let url = response.url().clone();
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            debug!("Failed to decode response from {url}: {e}");
            ApiError::Decode(e.to_string())
        })
    }
}

/// Turn non-success responses into `ApiError::Status` carrying the
/// backend's message
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = backend_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Extract the human-readable part of an error body
///
/// Prefers a JSON `detail` or `error` string, then falls back to the raw
/// body text.
fn backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["detail", "error", "message"] {
            if let Some(Value::String(text)) = map.get(key) {
                return Some(text.clone());
            }
        }
    }

    Some(trimmed.to_string())
}

impl StatusSource for BackendClient {
    fn fetch_status(&self) -> impl Future<Output = ApiResult<ServerStatus>> + Send {
        BackendClient::fetch_status(self)
    }
}

impl SearchBackend for BackendClient {
    fn search(&self, query: &str) -> impl Future<Output = ApiResult<Vec<SearchResult>>> + Send {
        BackendClient::search(self, query)
    }
}

impl DataSourceApi for BackendClient {
    fn list_data_source_types(
        &self,
    ) -> impl Future<Output = ApiResult<Vec<DataSourceType>>> + Send {
        BackendClient::list_data_source_types(self)
    }

    fn list_connected_data_sources(
        &self,
    ) -> impl Future<Output = ApiResult<Vec<ConnectedDataSource>>> + Send {
        BackendClient::list_connected_data_sources(self)
    }

    fn add_data_source(
        &self,
        request: &AddDataSourceRequest,
    ) -> impl Future<Output = ApiResult<i64>> + Send {
        BackendClient::add_data_source(self, request)
    }

    fn remove_data_source(&self, id: i64) -> impl Future<Output = ApiResult<()>> + Send {
        BackendClient::remove_data_source(self, id)
    }

    fn list_locations(
        &self,
        source_type: &str,
        config: &Value,
    ) -> impl Future<Output = ApiResult<Vec<IndexLocation>>> + Send {
        BackendClient::list_locations(self, source_type, config)
    }
}
