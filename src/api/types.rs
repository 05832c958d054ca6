//! Wire types exchanged with the backend
//!
//! Every field the backend may omit is defaulted so older backends that
//! return a subset still decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Aggregate indexing counters reported by the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerStatus {
    #[serde(default)]
    pub docs_in_indexing: u64,
    #[serde(default)]
    pub docs_left_to_index: u64,
    #[serde(default)]
    pub docs_indexed: u64,
}

impl ServerStatus {
    #[must_use]
    pub fn new(docs_in_indexing: u64, docs_left_to_index: u64, docs_indexed: u64) -> Self {
        Self {
            docs_in_indexing,
            docs_left_to_index,
            docs_indexed,
        }
    }

    /// Documents currently being indexed or waiting in the queue
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.docs_in_indexing > 0 || self.docs_left_to_index > 0
    }
}

/// A run of result text, optionally highlighted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPart {
    pub content: String,
    pub bold: bool,
}

/// One search hit as returned by the backend
///
/// The client only forwards these to the view; unknown fields are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub result_type: Option<String>,
    pub data_source: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub author_image_url: Option<String>,
    pub author_image_data: Option<String>,
    pub time: Option<String>,
    pub content: Vec<TextPart>,
    pub score: Option<f64>,
    pub location: Option<String>,
    pub file_type: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    /// Result text with highlighting dropped
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.content.iter().map(|part| part.content.as_str()).collect()
    }
}

/// Input widget kind of a data-source configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlInputType {
    #[default]
    Text,
    Textarea,
    Password,
}

/// One configuration field of a data-source type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigField {
    pub name: String,
    #[serde(default)]
    pub input_type: HtmlInputType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// An integration the backend knows how to ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceType {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub config_fields: Vec<ConfigField>,
    #[serde(default)]
    pub image_base64: String,
    #[serde(default)]
    pub has_prerequisites: bool,
}

/// A data source currently connected to the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectedDataSource {
    pub id: i64,
    pub name: String,
}

/// A sub-location that can be selected for indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexLocation {
    pub value: String,
    pub label: String,
}

/// Body of a connect-data-source request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddDataSourceRequest {
    pub name: String,
    pub config: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations_to_index: Vec<IndexLocation>,
}

/// Id returned by the backend for a newly connected source
///
/// Accepts both a bare number and an `{ "id": n }` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreatedId {
    Bare(i64),
    Wrapped { id: i64 },
}

impl CreatedId {
    pub(crate) fn id(self) -> i64 {
        match self {
            CreatedId::Bare(id) | CreatedId::Wrapped { id } => id,
        }
    }
}
