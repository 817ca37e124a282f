//! `TaskDeck` — task assignment tracker client.
//!
//! Polls the task store for the configured user, derives deadline alerts,
//! and prints them with a badge count. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! cargo run --bin taskdeck -- --store-url http://127.0.0.1:7070 \
//!     --user-id 0191d3a0-0000-7000-8000-000000000001
//!
//! # Or via environment variables
//! TASKDECK_STORE_URL=http://127.0.0.1:7070 TASKDECK_USER_ID=... cargo run
//! ```

use clap::Parser;

use taskdeck::client::StoreClient;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::poll::{self, PollCommand, PollEvent};
use taskdeck_proto::alert::Severity;
use taskdeck_proto::task::Task;

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let Some(user) = config.user_id else {
        eprintln!("No user id configured; pass --user-id or set TASKDECK_USER_ID");
        std::process::exit(1);
    };

    tracing::info!(store = %config.store_url, user = %user, "taskdeck starting");

    let source = StoreClient::new(&config.store_url);
    let (cmd_tx, mut evt_rx) = poll::spawn_poller(source, user, &config.to_poller_config());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                let _ = cmd_tx.send(PollCommand::Shutdown).await;
                break;
            }
            event = evt_rx.recv() => match event {
                Some(PollEvent::Refreshed { tasks, new_alerts, badge_count }) => {
                    for alert in &new_alerts {
                        let tag = match alert.severity() {
                            Severity::Info => "info",
                            Severity::Warning => "warning",
                            Severity::Error => "error",
                        };
                        println!("[{tag}] {}: {}", alert.title, alert.message);
                    }
                    if !new_alerts.is_empty() {
                        println!("{badge_count} unread alert(s)");
                    }
                    tracing::debug!(tasks = tasks.len(), "task list refreshed");
                    for task in &tasks {
                        tracing::debug!("{}", describe_task(task));
                    }
                }
                Some(PollEvent::Dismissed { key, badge_count }) => {
                    tracing::info!(key = %key, badge = badge_count, "alert dismissed");
                }
                Some(PollEvent::Error(e)) => {
                    tracing::warn!(error = %e, "poll failed");
                }
                None => break,
            },
        }
    }

    tracing::info!("taskdeck exiting");
}

/// One-line human-readable task summary for debug logging.
fn describe_task(task: &Task) -> String {
    let status = task
        .status
        .map_or_else(|| "unknown".to_string(), |s| s.to_string());
    let due = task
        .deadline_ms
        .and_then(|ms| chrono::DateTime::from_timestamp_millis(i64::try_from(ms).ok()?))
        .map_or_else(
            || "no deadline".to_string(),
            |dt| format!("due {}", dt.format("%Y-%m-%d %H:%M")),
        );
    let timer = if task.timer_running() { ", timer running" } else { "" };
    format!(
        "{} [{}] {} ({}s logged{})",
        task.title, status, due, task.time_spent_secs, timer
    )
}
