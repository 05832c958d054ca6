//! Status poller loop tests on a paused clock

use search_sync_client::api::ServerStatus;
use search_sync_client::notifications::{NotificationBus, NotificationKind};
use search_sync_client::poller::{
    ConnectionState, IndexingPhase, PollerSettings, StatusPoller, Visibility,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{Instant, timeout};

mod common;
use common::{ScriptedBackend, StatusReply};

fn settings() -> PollerSettings {
    PollerSettings {
        poll_interval: Duration::from_secs(1),
        retry_interval: Duration::from_secs(1),
        status_timeout: Duration::from_secs(3),
        failure_threshold: 5,
        quiet_period: Duration::from_secs(10),
    }
}

#[tokio::test(start_paused = true)]
async fn test_five_failures_report_server_down_once() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_status([StatusReply::Fail(503); 5]);
    let bus = NotificationBus::new(16);
    let mut rx = bus.subscribe();

    let handle = StatusPoller::new(
        Arc::clone(&backend),
        bus.clone(),
        settings(),
        Visibility::default(),
    )
    .spawn();

    let notification = timeout(Duration::from_secs(30), rx.recv())
        .await
        .expect("server down within 30s")
        .expect("bus open");
    assert_eq!(notification.kind, NotificationKind::ServerDown);
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 5);
    assert_eq!(handle.current().connection, ConnectionState::Down);

    // Failures keep coming; nothing more is reported
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    assert!(handle.current().is_server_down());

    handle.stop();
    handle.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_recovery_reports_server_online() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_status([StatusReply::Fail(502); 5]);
    backend.script_status([StatusReply::Ok(ServerStatus::default())]);
    let bus = NotificationBus::new(16);
    let mut rx = bus.subscribe();

    let handle = StatusPoller::new(
        Arc::clone(&backend),
        bus.clone(),
        settings(),
        Visibility::default(),
    )
    .spawn();

    let down = timeout(Duration::from_secs(30), rx.recv()).await.unwrap().unwrap();
    assert_eq!(down.kind, NotificationKind::ServerDown);

    let online = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(online.kind, NotificationKind::ServerOnline);

    let snapshot = handle.current();
    assert_eq!(snapshot.connection, ConnectionState::Up);
    assert_eq!(snapshot.consecutive_failures, 0);
}

#[tokio::test(start_paused = true)]
async fn test_hung_status_request_counts_as_failure() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_status([StatusReply::Hang]);
    let bus = NotificationBus::new(16);
    let mut rx = bus.subscribe();
    let start = Instant::now();

    let _handle = StatusPoller::new(
        Arc::clone(&backend),
        bus.clone(),
        settings(),
        Visibility::default(),
    )
    .spawn();

    let down = timeout(Duration::from_secs(60), rx.recv()).await.unwrap().unwrap();
    assert_eq!(down.kind, NotificationKind::ServerDown);
    // Five 3s timeouts with 1s pauses in between
    assert!(start.elapsed() >= Duration::from_secs(19));
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn test_background_holds_back_server_down() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_status([StatusReply::Fail(503)]);
    let bus = NotificationBus::new(16);
    let mut rx = bus.subscribe();
    let visibility = Visibility::new(false);

    let handle = StatusPoller::new(
        Arc::clone(&backend),
        bus.clone(),
        settings(),
        visibility.clone(),
    )
    .spawn();

    tokio::time::sleep(Duration::from_secs(12)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(handle.current().connection, ConnectionState::Up);

    visibility.set_foreground(true);
    let down = timeout(Duration::from_secs(3), rx.recv()).await.unwrap().unwrap();
    assert_eq!(down.kind, NotificationKind::ServerDown);
}

#[tokio::test(start_paused = true)]
async fn test_indexing_finished_after_quiet_period() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_status([
        StatusReply::Ok(ServerStatus::new(5, 0, 0)),
        StatusReply::Ok(ServerStatus::new(0, 0, 0)),
    ]);
    let bus = NotificationBus::new(16);
    let mut rx = bus.subscribe();
    let start = Instant::now();

    let handle = StatusPoller::new(
        Arc::clone(&backend),
        bus.clone(),
        settings(),
        Visibility::default(),
    )
    .spawn();

    let mut snapshots = handle.subscribe();
    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow().phase, IndexingPhase::Indexing);

    let finished = timeout(Duration::from_secs(30), rx.recv()).await.unwrap().unwrap();
    assert_eq!(finished.kind, NotificationKind::IndexingFinished);
    assert!(start.elapsed() > Duration::from_secs(10));
    assert_eq!(handle.current().phase, IndexingPhase::Idle);

    // Staying idle does not repeat the notification
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_polling() {
    let backend = Arc::new(ScriptedBackend::new());
    let bus = NotificationBus::new(16);

    let handle = StatusPoller::new(
        Arc::clone(&backend),
        bus.clone(),
        settings(),
        Visibility::default(),
    )
    .spawn();

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(handle.is_running());

    handle.stop();
    handle.join().await;
    assert!(!handle.is_running());

    let calls = backend.status_calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), calls);
}
