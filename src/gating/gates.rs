use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::poller::{IndexingPhase, StatusSnapshot};
use crate::storage::{LocalStore, keys};

use super::types::{Banner, BaseView, Overlay, Screen, SearchBlocked};

#[derive(Debug, Default)]
struct GateState {
    community_passed: bool,
    /// Source whose first indexing is pending (durable)
    first_index_source: Option<String>,
    /// Whether the first-index panel is shown (in-memory only)
    first_index_panel: bool,
    /// `docs_indexed` when the first-index gate was set (in-memory only)
    first_index_baseline: u64,
    /// Connected source count, `None` until listed once
    connected_count: Option<usize>,
}

/// Onboarding gate state
///
/// Durable flags live in the local store so they survive restarts; panel
/// visibility does not.
#[derive(Debug)]
pub struct Gates {
    store: LocalStore,
    passphrase: Option<String>,
    state: Mutex<GateState>,
}

impl Gates {
    /// Restore gate state from `store`
    ///
    /// `passphrase` is the accepted community passphrase; with `None` the
    /// community gate can only be skipped.
    #[must_use]
    pub fn load(store: LocalStore, passphrase: Option<String>) -> Self {
        let community_passed = store.get::<bool>(keys::COMMUNITY_GATE).unwrap_or(false);
        let first_index_source = store.get::<String>(keys::FIRST_TIME_INDEXING);

        debug!(
            "Gates loaded (community passed: {community_passed}, first index pending: {first_index_source:?})"
        );

        Self {
            store,
            passphrase,
            state: Mutex::new(GateState {
                community_passed,
                first_index_source,
                ..GateState::default()
            }),
        }
    }

    /// Try to pass the community gate
    ///
    /// Returns whether the trimmed input matched the configured passphrase
    /// exactly. A mismatch leaves the gate closed.
    pub fn submit_passphrase(&self, input: &str) -> bool {
        let accepted = self
            .passphrase
            .as_deref()
            .is_some_and(|expected| input.trim() == expected);

        if accepted {
            self.pass_community_gate();
        } else {
            debug!("Community passphrase rejected");
        }
        accepted
    }

    /// Pass the community gate without a passphrase
    pub fn skip_community_gate(&self) {
        info!("Community gate skipped");
        self.pass_community_gate();
    }

    #[must_use]
    pub fn is_community_passed(&self) -> bool {
        self.state.lock().community_passed
    }

    /// Record the size of a freshly fetched connected-source list
    pub fn on_connected_sources(&self, count: usize) {
        self.state.lock().connected_count = Some(count);
    }

    /// The first data source was connected; block searching until its
    /// initial indexing finishes
    ///
    /// `indexed_so_far` is the backend's `docs_indexed` before the source
    /// was added.
    pub fn on_first_source_connected(&self, name: &str, indexed_so_far: u64) {
        {
            let mut state = self.state.lock();
            state.first_index_source = Some(name.to_string());
            state.first_index_panel = true;
            state.first_index_baseline = indexed_so_far;
        }
        info!("Waiting for first indexing of {name}");
        if let Err(e) = self.store.set(keys::FIRST_TIME_INDEXING, name) {
            warn!("Failed to persist first indexing flag: {e}");
        }
    }

    /// Lift the first-index gate from a poller snapshot
    ///
    /// A source small enough to be indexed between two polls never shows
    /// up as indexing, so no `IndexingFinished` follows it. An idle reading
    /// with nothing queued or in flight and more documents indexed than
    /// before the source was added counts as finished too.
    pub fn on_status(&self, snapshot: &StatusSnapshot) {
        let finished = {
            let state = self.state.lock();
            state.first_index_source.is_some()
                && snapshot.phase == IndexingPhase::Idle
                && snapshot.status.is_some_and(|status| {
                    status.docs_in_indexing == 0
                        && status.docs_left_to_index == 0
                        && status.docs_indexed > state.first_index_baseline
                })
        };
        if finished {
            debug!("Quiet status reading shows new documents indexed");
            self.on_indexing_finished();
        }
    }

    /// Indexing went idle; lift the first-index gate if it was set
    pub fn on_indexing_finished(&self) {
        let cleared = {
            let mut state = self.state.lock();
            state.first_index_panel = false;
            state.first_index_source.take()
        };

        if let Some(name) = cleared {
            info!("First indexing of {name} finished");
            if let Err(e) = self.store.remove(keys::FIRST_TIME_INDEXING) {
                warn!("Failed to clear first indexing flag: {e}");
            }
        }
    }

    /// Hide the first-index panel
    ///
    /// Searching stays blocked; the next attempt shows the panel again.
    pub fn dismiss_first_index_panel(&self) {
        self.state.lock().first_index_panel = false;
    }

    #[must_use]
    pub fn first_index_pending(&self) -> Option<String> {
        self.state.lock().first_index_source.clone()
    }

    /// Check the gates that block searching
    ///
    /// A blocked attempt while the first index is pending re-shows its
    /// panel. Server reachability is not a gate and is checked by the
    /// caller.
    pub fn check_search_allowed(&self) -> Result<(), SearchBlocked> {
        let mut state = self.state.lock();

        if !state.community_passed {
            return Err(SearchBlocked::CommunityGate);
        }

        if let Some(name) = &state.first_index_source {
            let name = name.clone();
            state.first_index_panel = true;
            return Err(SearchBlocked::FirstIndexNotReady { name });
        }

        Ok(())
    }

    /// Resolve what the user should see
    #[must_use]
    pub fn screen(&self, has_results: bool) -> Screen {
        let state = self.state.lock();

        let overlay = if !state.community_passed {
            Some(Overlay::CommunityGate)
        } else if state.first_index_panel {
            state
                .first_index_source
                .clone()
                .map(|name| Overlay::FirstIndexNotReady { name })
        } else {
            None
        };

        let banner = (state.community_passed && state.connected_count == Some(0))
            .then_some(Banner::NoSourcesConnected);

        let base = if has_results {
            BaseView::Results
        } else {
            BaseView::Landing
        };

        Screen {
            overlay,
            banner,
            base,
        }
    }

    fn pass_community_gate(&self) {
        self.state.lock().community_passed = true;
        if let Err(e) = self.store.set(keys::COMMUNITY_GATE, &true) {
            warn!("Failed to persist community gate: {e}");
        }
    }
}
