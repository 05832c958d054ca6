pub mod api;
pub mod config;
pub mod data_sources;
pub mod gating;
pub mod history;
pub mod notifications;
pub mod poller;
pub mod search;
pub mod session;
pub mod storage;
pub mod utils;

pub use api::{
    ApiError, Backend, BackendClient, ConnectedDataSource, DataSourceType, IndexLocation,
    SearchResult, ServerStatus,
};
pub use config::ClientConfig;
pub use data_sources::{AddedSource, DataSourceRegistry, SourceEntry};
pub use gating::{Banner, BaseView, Gates, Overlay, Screen, SearchBlocked};
pub use history::SearchHistory;
pub use notifications::{Notification, NotificationBus, NotificationKind, Severity};
pub use poller::{
    ConnectionState, IndexingPhase, PollerHandle, PollerState, StatusPoller, StatusSnapshot,
    Visibility,
};
pub use search::{SearchError, SearchExecutor, SearchOutcome, SearchResponse};
pub use session::{Session, SubmitError};
pub use storage::{LocalStore, StoreError};
