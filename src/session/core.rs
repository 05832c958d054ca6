//! Session composition root

use anyhow::{Context, Result};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::api::{ApiError, Backend, BackendClient, IndexLocation};
use crate::config::ClientConfig;
use crate::data_sources::{AddedSource, DataSourceRegistry, SourceEntry};
use crate::gating::{Gates, Screen, SearchBlocked};
use crate::history::SearchHistory;
use crate::notifications::{
    FilteredReceiver, Notification, NotificationBus, NotificationBusConfig, NotificationError,
    NotificationKind,
};
use crate::poller::{PollerHandle, PollerSettings, StatusPoller, StatusSnapshot, Visibility};
use crate::search::{SearchExecutor, SearchOutcome, SearchResponse};
use crate::storage::LocalStore;

use super::errors::SubmitError;

/// A running client session
///
/// Owns the local store, the notification bus, the gates, the search
/// history and the background tasks. Background tasks start with
/// [`Session::start`] and stop with [`Session::shutdown`] or on drop.
pub struct Session<B: Backend = BackendClient> {
    config: ClientConfig,
    store: LocalStore,
    backend: Arc<B>,
    bus: NotificationBus,
    history: Arc<SearchHistory>,
    gates: Arc<Gates>,
    registry: DataSourceRegistry<B>,
    executor: SearchExecutor<B>,
    visibility: Visibility,
    poller: Mutex<Option<PollerHandle>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    results: Mutex<Option<SearchResponse>>,
}

impl Session<BackendClient> {
    /// Open the local store under the configured storage directory and
    /// connect an HTTP backend client
    pub fn open(config: ClientConfig) -> Result<Self> {
        let path = config.local_store_path();
        let store = LocalStore::open(&path)
            .with_context(|| format!("Failed to open local store at {}", path.display()))?;

        let client_id = store.client_id();
        let backend = BackendClient::new(config.base_url().clone(), client_id)
            .context("Failed to create backend client")?;

        info!(
            "Session opened for {} (client id {client_id})",
            config.base_url()
        );
        Ok(Self::with_backend(config, store, backend))
    }
}

impl<B: Backend> Session<B> {
    /// Assemble a session around an existing store and backend
    pub fn with_backend(config: ClientConfig, store: LocalStore, backend: B) -> Self {
        let backend = Arc::new(backend);
        let bus = NotificationBus::with_config(NotificationBusConfig {
            capacity: config.notification_capacity(),
        });
        let history = Arc::new(SearchHistory::load(
            store.clone(),
            config.history_capacity(),
            config.suggestion_limit(),
        ));
        let gates = Arc::new(Gates::load(
            store.clone(),
            config.community_passphrase().map(str::to_string),
        ));
        let registry = DataSourceRegistry::new(Arc::clone(&backend), bus.clone());
        let executor = SearchExecutor::new(
            Arc::clone(&backend),
            Arc::clone(&history),
            bus.clone(),
            config.search_timeout(),
        );

        Self {
            config,
            store,
            backend,
            bus,
            history,
            gates,
            registry,
            executor,
            visibility: Visibility::default(),
            poller: Mutex::new(None),
            listener: Mutex::new(None),
            results: Mutex::new(None),
        }
    }

    /// Start the status poller and the gate listener
    ///
    /// Must be called from within a tokio runtime. Calling it again while
    /// running has no effect.
    pub fn start(&self) {
        let mut poller = self.poller.lock();
        if poller.is_some() {
            debug!("Session already started");
            return;
        }

        // Subscribe before the poller can publish anything
        let receiver = self.bus.subscribe_filtered(|notification| {
            matches!(
                notification.kind,
                NotificationKind::IndexingFinished | NotificationKind::Shutdown
            )
        });

        let handle = StatusPoller::new(
            Arc::clone(&self.backend),
            self.bus.clone(),
            PollerSettings::from_config(&self.config),
            self.visibility.clone(),
        )
        .spawn();
        *self.listener.lock() = Some(tokio::spawn(listen(
            receiver,
            handle.subscribe(),
            Arc::clone(&self.gates),
        )));
        *poller = Some(handle);
    }

    /// Whether the user is looking at the client
    pub fn set_foreground(&self, foreground: bool) {
        debug!("Session foreground: {foreground}");
        self.visibility.set_foreground(foreground);
    }

    /// Latest poller snapshot; the initial state before the first poll
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        self.poller
            .lock()
            .as_ref()
            .map(PollerHandle::current)
            .unwrap_or_default()
    }

    /// Snapshots published after every poll; `None` before [`Session::start`]
    #[must_use]
    pub fn status_updates(&self) -> Option<watch::Receiver<StatusSnapshot>> {
        self.poller.lock().as_ref().map(PollerHandle::subscribe)
    }

    /// Submit a search
    ///
    /// Checks, in order: empty query, community gate, first-index gate and
    /// server reachability. A completed search replaces the current
    /// results; a failed one leaves them untouched.
    pub async fn submit_search(&self, query: &str) -> Result<SearchOutcome, SubmitError> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Rejected);
        }

        self.gates.check_search_allowed()?;
        if self.status().is_server_down() {
            return Err(SearchBlocked::ServerDown.into());
        }

        let outcome = self.executor.execute(query).await?;
        if let SearchOutcome::Completed(response) = &outcome {
            let mut results = self.results.lock();
            let newer = results
                .as_ref()
                .is_none_or(|current| current.generation < response.generation);
            if newer {
                *results = Some(response.clone());
            }
        }
        Ok(outcome)
    }

    pub fn clear_results(&self) {
        *self.results.lock() = None;
    }

    /// The currently displayed search response
    #[must_use]
    pub fn results(&self) -> Option<SearchResponse> {
        self.results.lock().clone()
    }

    /// Forget every recorded query
    pub fn clear_history(&self) {
        self.history.clear();
    }

    /// Completion suffixes from the search history
    #[must_use]
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.history.suggest(prefix)
    }

    pub fn submit_passphrase(&self, input: &str) -> bool {
        self.gates.submit_passphrase(input)
    }

    pub fn skip_community_gate(&self) {
        self.gates.skip_community_gate();
    }

    pub fn dismiss_first_index_panel(&self) {
        self.gates.dismiss_first_index_panel();
    }

    /// Fetch the connected sources and update the no-sources banner
    pub async fn refresh_sources(&self) -> Result<Vec<SourceEntry>, ApiError> {
        let connected = self.registry.refresh_connected().await?;
        self.gates.on_connected_sources(connected.len());
        Ok(self.registry.connected())
    }

    /// Connect a data source of type `name`
    ///
    /// Connecting the first source blocks searching until its indexing
    /// finishes.
    pub async fn add_data_source(
        &self,
        name: &str,
        config: Map<String, Value>,
        locations_to_index: Vec<IndexLocation>,
    ) -> Result<AddedSource, ApiError> {
        let indexed_so_far = self
            .status()
            .status
            .map_or(0, |status| status.docs_indexed);
        let added = self.registry.add(name, config, locations_to_index).await?;
        if added.first {
            self.gates
                .on_first_source_connected(&added.source.name, indexed_so_far);
        }
        self.gates.on_connected_sources(self.registry.confirmed_count());
        Ok(added)
    }

    pub async fn remove_data_source(&self, id: i64) -> Result<(), ApiError> {
        self.registry.remove(id).await?;
        if self.registry.is_known() {
            self.gates.on_connected_sources(self.registry.confirmed_count());
        }
        Ok(())
    }

    /// What the user should see right now
    #[must_use]
    pub fn screen(&self) -> Screen {
        let has_results = self
            .results
            .lock()
            .as_ref()
            .is_some_and(|response| !response.is_empty());
        self.gates.screen(has_results)
    }

    /// Subscribe to user-visible notifications
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.bus.subscribe()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    #[must_use]
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    #[must_use]
    pub fn gates(&self) -> &Gates {
        &self.gates
    }

    #[must_use]
    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    #[must_use]
    pub fn registry(&self) -> &DataSourceRegistry<B> {
        &self.registry
    }

    /// Stop the background tasks and close the notification bus
    pub async fn shutdown(&self) {
        let poller = self.poller.lock().take();
        if let Some(poller) = poller {
            poller.stop();
            poller.join().await;
        }

        // The listener exits on the final Shutdown notification
        self.bus.shutdown();
        let listener = self.listener.lock().take();
        if let Some(listener) = listener
            && let Err(e) = listener.await
        {
            warn!("Gate listener ended abnormally: {e}");
        }

        info!("Session shut down");
    }
}

impl<B: Backend> Drop for Session<B> {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get_mut().take() {
            listener.abort();
        }
    }
}

/// Apply notifications and poller snapshots that affect the gates
async fn listen<F>(
    mut receiver: FilteredReceiver<F>,
    mut snapshots: watch::Receiver<StatusSnapshot>,
    gates: Arc<Gates>,
) where
    F: Fn(&Notification) -> bool + Send + Sync + 'static,
{
    let mut polling = true;
    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Ok(notification) => match notification.kind {
                    NotificationKind::IndexingFinished => gates.on_indexing_finished(),
                    NotificationKind::Shutdown => break,
                    _ => {}
                },
                Err(NotificationError::ReceiverLagged(skipped)) => {
                    // A skipped IndexingFinished is recovered from the snapshot
                    warn!("Gate listener skipped {skipped} notifications");
                    let snapshot = snapshots.borrow().clone();
                    gates.on_status(&snapshot);
                }
                Err(_) => break,
            },
            changed = snapshots.changed(), if polling => {
                if changed.is_ok() {
                    let snapshot = snapshots.borrow_and_update().clone();
                    gates.on_status(&snapshot);
                } else {
                    debug!("Poller stopped, gate listener keeps notifications only");
                    polling = false;
                }
            }
        }
    }
    debug!("Gate listener stopped");
}
