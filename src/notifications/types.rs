//! Notification type definitions
//!
//! Notifications are short user-facing signals raised by the poller, the
//! search executor and the data-source registry. They carry no reply
//! channel; delivery is best effort.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// The backend answered again after being reported down
    ServerOnline,
    /// Several consecutive status polls failed
    ServerDown,
    /// Indexing activity stopped for longer than the quiet period
    IndexingFinished,
    /// A search completed with an empty result set
    NoResults { query: String },
    /// A search request failed
    SearchFailed { query: String, message: String },
    /// A data source was connected and indexing started
    DataSourceAdded { name: String },
    /// Connecting a data source failed
    DataSourceAddFailed { name: String, message: String },
    /// A data source was disconnected
    DataSourceRemoved { id: i64 },
    /// Disconnecting a data source failed
    DataSourceRemoveFailed { id: i64, message: String },
    /// The session is shutting down; subscribers should exit
    Shutdown,
}

/// A user-visible notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub fn new(kind: NotificationKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn server_online() -> Self {
        Self::new(NotificationKind::ServerOnline)
    }

    #[must_use]
    pub fn server_down() -> Self {
        Self::new(NotificationKind::ServerDown)
    }

    #[must_use]
    pub fn indexing_finished() -> Self {
        Self::new(NotificationKind::IndexingFinished)
    }

    #[must_use]
    pub fn no_results(query: impl Into<String>) -> Self {
        Self::new(NotificationKind::NoResults {
            query: query.into(),
        })
    }

    #[must_use]
    pub fn search_failed(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::SearchFailed {
            query: query.into(),
            message: message.into(),
        })
    }

    #[must_use]
    pub fn data_source_added(name: impl Into<String>) -> Self {
        Self::new(NotificationKind::DataSourceAdded { name: name.into() })
    }

    #[must_use]
    pub fn data_source_add_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::DataSourceAddFailed {
            name: name.into(),
            message: message.into(),
        })
    }

    #[must_use]
    pub fn data_source_removed(id: i64) -> Self {
        Self::new(NotificationKind::DataSourceRemoved { id })
    }

    #[must_use]
    pub fn data_source_remove_failed(id: i64, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::DataSourceRemoveFailed {
            id,
            message: message.into(),
        })
    }

    #[must_use]
    pub fn shutdown() -> Self {
        Self::new(NotificationKind::Shutdown)
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self.kind {
            NotificationKind::ServerOnline
            | NotificationKind::IndexingFinished
            | NotificationKind::DataSourceAdded { .. }
            | NotificationKind::DataSourceRemoved { .. } => Severity::Success,
            NotificationKind::NoResults { .. } | NotificationKind::Shutdown => Severity::Info,
            NotificationKind::ServerDown => Severity::Warning,
            NotificationKind::SearchFailed { .. }
            | NotificationKind::DataSourceAddFailed { .. }
            | NotificationKind::DataSourceRemoveFailed { .. } => Severity::Error,
        }
    }

    /// How long the notification stays visible; `None` until dismissed
    #[must_use]
    pub fn auto_close(&self) -> Option<Duration> {
        match self.kind {
            NotificationKind::ServerOnline => Some(Duration::from_secs(2)),
            NotificationKind::NoResults { .. } | NotificationKind::DataSourceRemoved { .. } => {
                Some(Duration::from_secs(3))
            }
            NotificationKind::IndexingFinished | NotificationKind::DataSourceAdded { .. } => {
                Some(Duration::from_secs(5))
            }
            NotificationKind::SearchFailed { .. }
            | NotificationKind::DataSourceAddFailed { .. }
            | NotificationKind::DataSourceRemoveFailed { .. } => Some(Duration::from_secs(10)),
            NotificationKind::ServerDown | NotificationKind::Shutdown => None,
        }
    }

    /// One-line text for plain terminal output
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            NotificationKind::ServerOnline => "Server online.".to_string(),
            NotificationKind::ServerDown => "Server is down, retrying...".to_string(),
            NotificationKind::IndexingFinished => "Indexing finished.".to_string(),
            NotificationKind::NoResults { query } => format!("No results for \"{query}\"."),
            NotificationKind::SearchFailed { message, .. } => format!("Search failed: {message}"),
            NotificationKind::DataSourceAdded { name } => {
                format!("Data source {name} added successfully, indexing...")
            }
            NotificationKind::DataSourceAddFailed { name, message } => {
                format!("Error adding data source {name}: {message}")
            }
            NotificationKind::DataSourceRemoved { id } => format!("Data source {id} removed."),
            NotificationKind::DataSourceRemoveFailed { id, message } => {
                format!("Error removing data source {id}: {message}")
            }
            NotificationKind::Shutdown => "Shutting down.".to_string(),
        }
    }
}
