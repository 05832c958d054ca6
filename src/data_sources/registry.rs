use log::{debug, info, warn};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{
    AddDataSourceRequest, ApiError, ConnectedDataSource, DataSourceApi, DataSourceType,
    IndexLocation,
};
use crate::notifications::{Notification, NotificationBus};

use super::types::{AddedSource, SourceEntry};

#[derive(Debug)]
struct Pending {
    token: u64,
    name: String,
}

#[derive(Debug, Default)]
struct RegistryState {
    types: Vec<DataSourceType>,
    confirmed: Vec<ConnectedDataSource>,
    pending: Vec<Pending>,
    /// Whether the connected list has been fetched at least once
    known: bool,
    next_token: u64,
}

/// Decrements the in-flight counter when dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Client-side list of data-source types and connected sources
///
/// The state lock is never held across a backend call.
pub struct DataSourceRegistry<B: DataSourceApi> {
    backend: Arc<B>,
    bus: NotificationBus,
    state: Mutex<RegistryState>,
    in_flight: AtomicUsize,
}

impl<B: DataSourceApi> DataSourceRegistry<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, bus: NotificationBus) -> Self {
        Self {
            backend,
            bus,
            state: Mutex::new(RegistryState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Fetch the integration types the backend supports
    pub async fn refresh_types(&self) -> Result<Vec<DataSourceType>, ApiError> {
        let _guard = InFlight::enter(&self.in_flight);
        let types = self.backend.list_data_source_types().await?;
        debug!("Backend supports {} data source types", types.len());
        self.state.lock().types = types.clone();
        Ok(types)
    }

    /// Last fetched integration types
    #[must_use]
    pub fn types(&self) -> Vec<DataSourceType> {
        self.state.lock().types.clone()
    }

    /// Replace the confirmed list with the backend's
    ///
    /// Pending adds are kept; they are resolved by their own request.
    pub async fn refresh_connected(&self) -> Result<Vec<ConnectedDataSource>, ApiError> {
        let _guard = InFlight::enter(&self.in_flight);
        let connected = self.backend.list_connected_data_sources().await?;

        let mut state = self.state.lock();
        state.confirmed = connected.clone();
        state.known = true;
        debug!(
            "Connected data sources refreshed ({} confirmed, {} pending)",
            state.confirmed.len(),
            state.pending.len()
        );
        Ok(connected)
    }

    /// Connect a data source of type `name`
    ///
    /// The connected list is fetched first if it is not known yet, so
    /// `first` reflects the backend rather than an empty local list.
    /// The source is listed as pending until the backend answers. On
    /// success it becomes confirmed and `DataSourceAdded` is published; on
    /// failure the pending entry is rolled back and `DataSourceAddFailed`
    /// carries the backend's message.
    pub async fn add(
        &self,
        name: &str,
        config: Map<String, Value>,
        locations_to_index: Vec<IndexLocation>,
    ) -> Result<AddedSource, ApiError> {
        let _guard = InFlight::enter(&self.in_flight);
        if !self.is_known() {
            match self.backend.list_connected_data_sources().await {
                Ok(connected) => {
                    let mut state = self.state.lock();
                    state.confirmed = connected;
                    state.known = true;
                }
                Err(e) => warn!("Connected data sources unknown before adding {name}: {e}"),
            }
        }

        let token = {
            let mut state = self.state.lock();
            state.next_token += 1;
            let token = state.next_token;
            state.pending.push(Pending {
                token,
                name: name.to_string(),
            });
            token
        };

        let request = AddDataSourceRequest {
            name: name.to_string(),
            config,
            locations_to_index,
        };
        let result = self.backend.add_data_source(&request).await;

        let mut state = self.state.lock();
        state.pending.retain(|pending| pending.token != token);

        match result {
            Ok(id) => {
                let source = ConnectedDataSource {
                    id,
                    name: name.to_string(),
                };
                // Never guess "first" from a list that was not fetched
                let first = state.known && state.confirmed.iter().all(|existing| existing.id == id);
                if !state.confirmed.iter().any(|existing| existing.id == id) {
                    state.confirmed.push(source.clone());
                }
                drop(state);

                info!("Data source {name} connected with id {id}");
                self.bus.notify(Notification::data_source_added(name));
                Ok(AddedSource { source, first })
            }
            Err(e) => {
                drop(state);
                warn!("Failed to connect data source {name}: {e}");
                self.bus
                    .notify(Notification::data_source_add_failed(name, e.user_message()));
                Err(e)
            }
        }
    }

    /// Disconnect the source with backend id `id`
    ///
    /// The entry disappears immediately and is restored at its previous
    /// position if the backend refuses.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        let _guard = InFlight::enter(&self.in_flight);
        let removed = {
            let mut state = self.state.lock();
            let index = state.confirmed.iter().position(|source| source.id == id);
            index.map(|index| (index, state.confirmed.remove(index)))
        };

        match self.backend.remove_data_source(id).await {
            Ok(()) => {
                info!("Data source {id} removed");
                self.bus.notify(Notification::data_source_removed(id));
                Ok(())
            }
            Err(e) => {
                if let Some((index, source)) = removed {
                    let mut state = self.state.lock();
                    let index = index.min(state.confirmed.len());
                    state.confirmed.insert(index, source);
                }
                warn!("Failed to remove data source {id}: {e}");
                self.bus
                    .notify(Notification::data_source_remove_failed(id, e.user_message()));
                Err(e)
            }
        }
    }

    /// Selectable sub-locations of a source type for `config`
    pub async fn list_locations(
        &self,
        source_type: &str,
        config: &Value,
    ) -> Result<Vec<IndexLocation>, ApiError> {
        let _guard = InFlight::enter(&self.in_flight);
        self.backend.list_locations(source_type, config).await
    }

    /// Confirmed sources followed by pending ones
    #[must_use]
    pub fn connected(&self) -> Vec<SourceEntry> {
        let state = self.state.lock();
        state
            .confirmed
            .iter()
            .cloned()
            .map(SourceEntry::Confirmed)
            .chain(state.pending.iter().map(|pending| SourceEntry::Pending {
                name: pending.name.clone(),
            }))
            .collect()
    }

    /// Number of confirmed sources
    #[must_use]
    pub fn confirmed_count(&self) -> usize {
        self.state.lock().confirmed.len()
    }

    /// Whether the connected list has been fetched at least once
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.state.lock().known
    }

    /// Whether any backend request of this registry is in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
