//! End-to-end session flows against a scripted backend

use search_sync_client::api::ServerStatus;
use search_sync_client::gating::{Banner, BaseView, Overlay, SearchBlocked};
use search_sync_client::notifications::NotificationKind;
use search_sync_client::search::SearchOutcome;
use search_sync_client::storage::LocalStore;
use search_sync_client::{Session, SubmitError};
use serde_json::{Map, json};
use std::time::Duration;
use tokio::time::timeout;

mod common;
use common::{ScriptedBackend, StatusReply, create_test_dir, test_config};

fn open_session(
    dir: &tempfile::TempDir,
    backend: ScriptedBackend,
    passphrase: Option<&str>,
) -> Session<ScriptedBackend> {
    let config = test_config(dir, passphrase);
    let store = LocalStore::open(config.local_store_path()).unwrap();
    Session::with_backend(config, store, backend)
}

fn blocked(result: Result<SearchOutcome, SubmitError>) -> SearchBlocked {
    match result {
        Err(SubmitError::Blocked(reason)) => reason,
        other => panic!("expected a blocked search, got {other:?}"),
    }
}

#[tokio::test]
async fn test_community_gate_blocks_until_passed() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_results("roadmap", &["Q3 roadmap"]);
    let session = open_session(&dir, backend, Some("open sesame"));

    assert_eq!(session.screen().overlay, Some(Overlay::CommunityGate));
    assert_eq!(
        blocked(session.submit_search("roadmap").await),
        SearchBlocked::CommunityGate
    );

    assert!(!session.submit_passphrase("Open Sesame"));
    assert!(session.submit_passphrase(" open sesame "));
    assert_eq!(session.screen().overlay, None);

    let outcome = session.submit_search("roadmap").await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Completed(_)));
    assert_eq!(session.results().unwrap().results.len(), 1);
    assert_eq!(session.screen().base, BaseView::Results);
}

#[tokio::test]
async fn test_community_gate_survives_restart() {
    let dir = create_test_dir().unwrap();
    {
        let session = open_session(&dir, ScriptedBackend::new(), None);
        session.skip_community_gate();
    }

    let reopened = open_session(&dir, ScriptedBackend::new(), None);
    assert!(reopened.gates().is_community_passed());
    assert_eq!(reopened.screen().overlay, None);
}

#[tokio::test]
async fn test_empty_query_changes_nothing() {
    let dir = create_test_dir().unwrap();
    let session = open_session(&dir, ScriptedBackend::new(), None);
    // Rejected even before the gate is consulted
    let outcome = session.submit_search("   ").await.unwrap();
    assert_eq!(outcome, SearchOutcome::Rejected);

    session.skip_community_gate();
    let outcome = session.submit_search("").await.unwrap();
    assert_eq!(outcome, SearchOutcome::Rejected);
    assert!(session.history().is_empty());
    assert!(session.results().is_none());
}

#[tokio::test]
async fn test_failed_search_keeps_previous_results() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new()
        .with_results("wiki", &["Team wiki"])
        .failing_query("broken");
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();
    let mut notifications = session.notifications();

    session.submit_search("wiki").await.unwrap();
    let error = session.submit_search("broken").await.unwrap_err();
    assert!(!error.is_blocked());

    let notification = notifications.recv().await.unwrap();
    assert_eq!(
        notification.kind,
        NotificationKind::SearchFailed {
            query: "broken".to_string(),
            message: "Search index unavailable".to_string(),
        }
    );
    assert_eq!(session.results().unwrap().query, "wiki");
    assert_eq!(session.suggest("w"), vec!["iki".to_string()]);
}

#[tokio::test]
async fn test_superseded_search_is_not_applied() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new()
        .with_results("slow", &["Old result"])
        .with_results("fast", &["New result"])
        .hold_query("slow");
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();

    let (slow, fast) = tokio::join!(session.submit_search("slow"), async {
        let outcome = session.submit_search("fast").await;
        session.backend().release();
        outcome
    });

    assert!(matches!(slow.unwrap(), SearchOutcome::Superseded { generation: 1 }));
    assert!(matches!(fast.unwrap(), SearchOutcome::Completed(_)));

    let shown = session.results().unwrap();
    assert_eq!(shown.query, "fast");
    assert_eq!(shown.results[0].title.as_deref(), Some("New result"));
}

#[tokio::test(start_paused = true)]
async fn test_server_down_blocks_search() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_results("anything", &["hit"]);
    backend.script_status([StatusReply::Fail(503)]);
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();
    let mut notifications = session.notifications();
    session.start();

    let down = timeout(Duration::from_secs(30), notifications.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(down.kind, NotificationKind::ServerDown);
    assert_eq!(
        blocked(session.submit_search("anything").await),
        SearchBlocked::ServerDown
    );

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_first_source_blocks_search_until_indexed() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_results("design doc", &["Design doc"]);
    backend.script_status([StatusReply::Ok(ServerStatus::new(0, 0, 0))]);
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();

    session.refresh_sources().await.unwrap();
    assert_eq!(session.screen().banner, Some(Banner::NoSourcesConnected));

    let added = session
        .add_data_source("confluence", Map::new(), Vec::new())
        .await
        .unwrap();
    assert!(added.first);
    assert_eq!(session.screen().banner, None);
    assert_eq!(
        session.screen().overlay,
        Some(Overlay::FirstIndexNotReady {
            name: "confluence".to_string()
        })
    );

    session.dismiss_first_index_panel();
    assert_eq!(session.screen().overlay, None);
    assert!(matches!(
        blocked(session.submit_search("design doc").await),
        SearchBlocked::FirstIndexNotReady { .. }
    ));
    assert!(session.screen().overlay.is_some());

    // The backend starts indexing, then goes quiet
    session.backend().script_status([
        StatusReply::Ok(ServerStatus::new(4, 10, 0)),
        StatusReply::Ok(ServerStatus::new(0, 0, 14)),
    ]);
    let mut notifications = session.notifications();
    session.start();

    loop {
        let notification = timeout(Duration::from_secs(60), notifications.recv())
            .await
            .unwrap()
            .unwrap();
        if notification.kind == NotificationKind::IndexingFinished {
            break;
        }
    }
    // Let the gate listener apply the notification
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(session.gates().first_index_pending(), None);
    let outcome = session.submit_search("design doc").await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Completed(_)));

    session.shutdown().await;
}

#[tokio::test]
async fn test_failed_add_rolls_back() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_connected(&[(7, "slack")]);
    backend.fail_adds("Invalid token");
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();
    session.refresh_sources().await.unwrap();
    let mut notifications = session.notifications();

    let config = json!({ "token": "nope" }).as_object().cloned().unwrap();
    let error = session
        .add_data_source("jira", config, Vec::new())
        .await
        .unwrap_err();
    assert_eq!(error.user_message(), "Invalid token");

    let names: Vec<String> = session
        .registry()
        .connected()
        .iter()
        .map(|entry| entry.name().to_string())
        .collect();
    assert_eq!(names, vec!["slack".to_string()]);
    assert!(!session.registry().is_busy());
    assert_eq!(session.gates().first_index_pending(), None);

    let notification = notifications.recv().await.unwrap();
    assert_eq!(
        notification.kind,
        NotificationKind::DataSourceAddFailed {
            name: "jira".to_string(),
            message: "Invalid token".to_string(),
        }
    );
}

#[tokio::test]
async fn test_second_source_does_not_gate_search() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_connected(&[(3, "google_drive")]);
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();
    session.refresh_sources().await.unwrap();

    let added = session
        .add_data_source("slack", Map::new(), Vec::new())
        .await
        .unwrap();
    assert!(!added.first);
    assert_eq!(session.gates().first_index_pending(), None);
    assert_eq!(session.registry().confirmed_count(), 2);
}

#[tokio::test]
async fn test_failed_remove_restores_entry() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_connected(&[(1, "confluence"), (2, "slack")]);
    backend.fail_removes("Data source is busy");
    let session = open_session(&dir, backend, None);
    session.refresh_sources().await.unwrap();
    let mut notifications = session.notifications();

    session.remove_data_source(1).await.unwrap_err();

    let ids: Vec<Option<i64>> = session
        .registry()
        .connected()
        .iter()
        .map(|entry| entry.id())
        .collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);

    let notification = notifications.recv().await.unwrap();
    assert_eq!(
        notification.kind,
        NotificationKind::DataSourceRemoveFailed {
            id: 1,
            message: "Data source is busy".to_string(),
        }
    );
}

#[tokio::test]
async fn test_add_without_refresh_checks_backend_sources() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new()
        .with_connected(&[(3, "google_drive")])
        .with_results("budget", &["Budget sheet"]);
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();

    let added = session
        .add_data_source("slack", Map::new(), Vec::new())
        .await
        .unwrap();

    assert!(!added.first);
    assert!(session.registry().is_known());
    assert_eq!(session.registry().confirmed_count(), 2);
    assert_eq!(session.gates().first_index_pending(), None);
    let outcome = session.submit_search("budget").await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Completed(_)));
}

#[tokio::test(start_paused = true)]
async fn test_source_indexed_between_polls_lifts_gate() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_results("handbook", &["Employee handbook"]);
    backend.script_status([
        StatusReply::Ok(ServerStatus::new(0, 0, 0)),
        StatusReply::Ok(ServerStatus::new(0, 0, 0)),
    ]);
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();
    session.refresh_sources().await.unwrap();
    session.start();

    let added = session
        .add_data_source("notion", Map::new(), Vec::new())
        .await
        .unwrap();
    assert!(added.first);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(session.gates().first_index_pending().as_deref(), Some("notion"));

    // Everything got indexed before the next poll saw any activity
    session
        .backend()
        .script_status([StatusReply::Ok(ServerStatus::new(0, 0, 9))]);
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(session.gates().first_index_pending(), None);
    let outcome = session.submit_search("handbook").await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Completed(_)));

    session.shutdown().await;
}

#[tokio::test]
async fn test_clear_history_forgets_queries() {
    let dir = create_test_dir().unwrap();
    let backend = ScriptedBackend::new().with_results("standup notes", &["Standup"]);
    let session = open_session(&dir, backend, None);
    session.skip_community_gate();

    session.submit_search("standup notes").await.unwrap();
    assert_eq!(session.suggest("stand"), vec!["up notes".to_string()]);

    session.clear_history();
    assert!(session.suggest("stand").is_empty());

    let reopened = open_session(&dir, ScriptedBackend::new(), None);
    assert!(reopened.history().is_empty());
}
