//! Background poll loop

use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::api::{ApiError, StatusSource};
use crate::notifications::NotificationBus;

use super::state::PollerState;
use super::types::{PollerSettings, StatusSnapshot, Visibility};

/// Periodically queries a `StatusSource` and publishes the derived state
///
/// Exactly one poll is in flight at a time. The next poll is scheduled only
/// after the previous one finished, `poll_interval` after a success and
/// `retry_interval` after a failure.
pub struct StatusPoller<S: StatusSource> {
    source: Arc<S>,
    bus: NotificationBus,
    settings: PollerSettings,
    visibility: Visibility,
}

impl<S: StatusSource> StatusPoller<S> {
    #[must_use]
    pub fn new(
        source: Arc<S>,
        bus: NotificationBus,
        settings: PollerSettings,
        visibility: Visibility,
    ) -> Self {
        Self {
            source,
            bus,
            settings,
            visibility,
        }
    }

    /// Start polling on the current runtime
    ///
    /// The first poll is issued immediately.
    pub fn spawn(self) -> PollerHandle {
        let (snapshots, receiver) = watch::channel(StatusSnapshot::default());
        let stop = Arc::new(Notify::new());
        let stopped = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(self.run(snapshots, Arc::clone(&stop), Arc::clone(&stopped)));

        PollerHandle {
            snapshots: receiver,
            stop,
            stopped,
            task: Mutex::new(Some(task)),
        }
    }

    async fn run(
        self,
        snapshots: watch::Sender<StatusSnapshot>,
        stop: Arc<Notify>,
        stopped: Arc<AtomicBool>,
    ) {
        let settings = self.settings;
        let mut state = PollerState::new(settings.failure_threshold, settings.quiet_period);

        info!(
            "Status poller started (interval {:?}, retry {:?}, threshold {})",
            settings.poll_interval, settings.retry_interval, settings.failure_threshold
        );

        loop {
            if stopped.load(Ordering::SeqCst) {
                break;
            }

            let outcome = tokio::select! {
                _ = stop.notified() => break,
                result = tokio::time::timeout(settings.status_timeout, self.source.fetch_status()) => result,
            };

            let foreground = self.visibility.is_foreground();
            let (notifications, delay) = match outcome {
                Ok(Ok(status)) => (
                    state.on_success(status, Instant::now(), foreground),
                    settings.poll_interval,
                ),
                Ok(Err(e)) => (state.on_failure(&e, foreground), settings.retry_interval),
                Err(_) => (
                    state.on_failure(&ApiError::Timeout(settings.status_timeout), foreground),
                    settings.retry_interval,
                ),
            };

            // Snapshot first so listeners reacting to a notification see
            // the state that caused it
            snapshots.send_replace(state.snapshot());
            for notification in notifications {
                self.bus.notify(notification);
            }

            tokio::select! {
                _ = stop.notified() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        debug!("Status poller stopped");
    }
}

/// Handle to a running poller
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct PollerHandle {
    snapshots: watch::Receiver<StatusSnapshot>,
    stop: Arc<Notify>,
    stopped: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PollerHandle {
    /// Receiver that observes every published snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.snapshots.clone()
    }

    /// Most recently published snapshot
    #[must_use]
    pub fn current(&self) -> StatusSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Ask the loop to exit
    ///
    /// An in-flight poll is abandoned and its result never applied.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.stop.notify_one();
    }

    /// Wait for the loop to exit
    pub async fn join(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            debug!("Status poller task ended abnormally: {e}");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
