use serde::Serialize;

use crate::api::ConnectedDataSource;

/// One row of the connected-sources list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceEntry {
    /// Known to the backend
    Confirmed(ConnectedDataSource),
    /// Added locally, waiting for the backend to confirm
    Pending { name: String },
}

impl SourceEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SourceEntry::Confirmed(source) => &source.name,
            SourceEntry::Pending { name } => name,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        match self {
            SourceEntry::Confirmed(source) => Some(source.id),
            SourceEntry::Pending { .. } => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, SourceEntry::Pending { .. })
    }
}

/// Result of a confirmed add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedSource {
    pub source: ConnectedDataSource,
    /// No other source was connected when this one was confirmed
    pub first: bool,
}
