// search-sync: line-oriented terminal front end for the search backend.
//
// Reads commands from stdin, prints notifications as they arrive and keeps
// polling the backend status in the background.

use anyhow::{Context, Result, anyhow};
use search_sync_client::utils::DEFAULT_BASE_URL;
use search_sync_client::{
    ClientConfig, Notification, NotificationKind, Overlay, Screen, SearchOutcome, Session,
    StatusSnapshot, SubmitError,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};
use tracing_subscriber::EnvFilter;

const URL_ENV: &str = "SEARCH_SYNC_URL";
const HOME_ENV: &str = "SEARCH_SYNC_HOME";
const PASSPHRASE_ENV: &str = "SEARCH_SYNC_PASSPHRASE";

/// One line of user input
#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Suggest(String),
    Sources,
    Types,
    Add { name: String, config: Map<String, Value> },
    Remove(i64),
    Locations { name: String, config: Value },
    Pass(String),
    Skip,
    Dismiss,
    Status,
    Clear,
    History,
    ClearHistory,
    Background,
    Foreground,
    Quit,
}

impl Command {
    /// Parse a line; `Ok(None)` for blank input
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Some(Command::Search(line.to_string())));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        let command = match name {
            "suggest" => Command::Suggest(args.to_string()),
            "sources" => Command::Sources,
            "types" => Command::Types,
            "add" => {
                let (source, config) = split_json_args(args)?;
                let Value::Object(config) = config else {
                    return Err(anyhow!("config must be a JSON object"));
                };
                Command::Add {
                    name: source,
                    config,
                }
            }
            "remove" => Command::Remove(
                args.parse()
                    .with_context(|| format!("invalid data source id: {args:?}"))?,
            ),
            "locations" => {
                let (source, config) = split_json_args(args)?;
                Command::Locations {
                    name: source,
                    config,
                }
            }
            "pass" => Command::Pass(args.to_string()),
            "skip" => Command::Skip,
            "dismiss" => Command::Dismiss,
            "status" => Command::Status,
            "clear" => Command::Clear,
            "history" => match args {
                "" => Command::History,
                "clear" => Command::ClearHistory,
                other => return Err(anyhow!("unknown history action {other:?}")),
            },
            "background" => Command::Background,
            "foreground" => Command::Foreground,
            "quit" | "q" => Command::Quit,
            other => return Err(anyhow!("unknown command :{other}")),
        };
        Ok(Some(command))
    }
}

/// Split `<type> <json>` arguments
fn split_json_args(args: &str) -> Result<(String, Value)> {
    let (name, json) = args
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("expected <type> <json-config>"))?;
    let config = serde_json::from_str(json.trim()).context("config is not valid JSON")?;
    Ok((name.to_string(), config))
}

fn load_config() -> Result<ClientConfig> {
    let base_url = std::env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let storage_dir = match std::env::var_os(HOME_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir()
            .map(|dir| dir.join("search-sync"))
            .ok_or_else(|| anyhow!("no data directory found, set {HOME_ENV}"))?,
    };

    ClientConfig::builder()
        .base_url(base_url)
        .storage_dir(storage_dir)
        .community_passphrase(std::env::var(PASSPHRASE_ENV).ok())
        .build()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let session = Arc::new(Session::open(config)?);

    let printer = tokio::spawn(print_notifications(session.notifications()));
    session.start();
    if let Some(snapshots) = session.status_updates() {
        tokio::spawn(print_phase_changes(snapshots));
    }

    if let Err(e) = session.refresh_sources().await {
        tracing::warn!("Could not list connected data sources: {e}");
    }
    print_screen(&session.screen());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        match Command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => run(&session, command).await,
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }

    session.shutdown().await;
    if let Err(e) = printer.await {
        tracing::warn!("Notification printer ended abnormally: {e}");
    }
    Ok(())
}

async fn run(session: &Session, command: Command) {
    match command {
        Command::Search(query) => match session.submit_search(&query).await {
            Ok(SearchOutcome::Completed(response)) => {
                println!(
                    "{} results for \"{}\" in {:.2}s",
                    response.results.len(),
                    response.query,
                    response.duration_secs()
                );
                for (rank, result) in response.results.iter().enumerate() {
                    let title = result.title.as_deref().unwrap_or("(untitled)");
                    let source = result.data_source.as_deref().unwrap_or("-");
                    println!("{:>3}. [{source}] {title}", rank + 1);
                    if let Some(url) = &result.url {
                        println!("     {url}");
                    }
                }
            }
            Ok(SearchOutcome::Superseded { .. } | SearchOutcome::Rejected) => {}
            // Request failures were already published as notifications
            Err(e) if e.is_blocked() => println!("{e}"),
            Err(SubmitError::Search(e)) if e.is_transient() => {
                println!("The backend may recover, try the search again shortly.");
            }
            Err(_) => {}
        },
        Command::Suggest(prefix) => {
            for suffix in session.suggest(&prefix) {
                println!("{prefix}{suffix}");
            }
        }
        Command::Sources => match session.refresh_sources().await {
            Ok(sources) if sources.is_empty() => println!("No data sources connected."),
            Ok(sources) => {
                for source in sources {
                    match source.id() {
                        Some(id) => println!("{id:>5}  {}", source.name()),
                        None => println!("  ...  {} (pending)", source.name()),
                    }
                }
            }
            Err(e) => println!("Could not list data sources: {}", e.user_message()),
        },
        Command::Types => match session.registry().refresh_types().await {
            Ok(types) => {
                for source_type in types {
                    let fields: Vec<&str> = source_type
                        .config_fields
                        .iter()
                        .map(|field| field.name.as_str())
                        .collect();
                    println!(
                        "{:<16} {} [{}]",
                        source_type.name,
                        source_type.display_name,
                        fields.join(", ")
                    );
                }
            }
            Err(e) => println!("Could not list data source types: {}", e.user_message()),
        },
        Command::Add { name, config } => {
            // Failures are published as notifications
            let _ = session.add_data_source(&name, config, Vec::new()).await;
            print_screen(&session.screen());
        }
        Command::Remove(id) => {
            let _ = session.remove_data_source(id).await;
        }
        Command::Locations { name, config } => {
            match session.registry().list_locations(&name, &config).await {
                Ok(locations) => {
                    for location in locations {
                        println!("{:<24} {}", location.value, location.label);
                    }
                }
                Err(e) => println!("Could not list locations: {}", e.user_message()),
            }
        }
        Command::Pass(phrase) => {
            if session.submit_passphrase(&phrase) {
                println!("Welcome aboard.");
            } else {
                println!("Wrong passphrase.");
            }
            print_screen(&session.screen());
        }
        Command::Skip => {
            session.skip_community_gate();
            print_screen(&session.screen());
        }
        Command::Dismiss => session.dismiss_first_index_panel(),
        Command::Status => {
            let snapshot = session.status();
            let counters = snapshot.status.unwrap_or_default();
            println!(
                "server {:?}, indexing {:?} (in progress {}, queued {}, indexed {})",
                snapshot.connection,
                snapshot.phase,
                counters.docs_in_indexing,
                counters.docs_left_to_index,
                counters.docs_indexed
            );
            let tally = session.bus().stats().tally();
            println!(
                "notifications: {} shown, {} warnings or errors, {} with nobody listening",
                tally.delivered(),
                tally.problems(),
                tally.unheard
            );
        }
        Command::Clear => session.clear_results(),
        Command::History => {
            for query in session.history().entries() {
                println!("{query}");
            }
        }
        Command::ClearHistory => {
            session.clear_history();
            println!("Search history cleared.");
        }
        Command::Background => session.set_foreground(false),
        Command::Foreground => session.set_foreground(true),
        Command::Quit => {}
    }
}

fn print_screen(screen: &Screen) {
    match &screen.overlay {
        Some(Overlay::CommunityGate) => {
            println!("Enter the community passphrase with :pass <phrase>, or :skip.");
        }
        Some(Overlay::FirstIndexNotReady { name }) => {
            println!("Indexing {name} for the first time. Search unlocks when it finishes.");
        }
        None => {}
    }
    if screen.banner.is_some() {
        println!("No data sources connected. Add one with :add <type> <json-config>.");
    }
}

/// Announce when the backend starts working on documents
async fn print_phase_changes(mut snapshots: watch::Receiver<StatusSnapshot>) {
    let mut active = snapshots.borrow().phase.is_active();
    while snapshots.changed().await.is_ok() {
        let now_active = snapshots.borrow_and_update().phase.is_active();
        if now_active && !active {
            println!("The backend is indexing documents.");
        }
        active = now_active;
    }
}

async fn print_notifications(mut receiver: broadcast::Receiver<Notification>) {
    loop {
        match receiver.recv().await {
            Ok(notification) => {
                if notification.kind == NotificationKind::Shutdown {
                    break;
                }
                println!("[{:?}] {}", notification.severity(), notification.message());
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!("Notification printer skipped {skipped} notifications");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
