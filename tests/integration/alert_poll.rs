//! Poller and alert derivation against an in-process store.
//!
//! Drives `Poller::tick` with injected clocks over a live `StoreClient`,
//! checking the suppression latch end to end: first poll notifies, later
//! polls stay quiet, and a state change on the store produces exactly the
//! new keys.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use taskdeck::client::StoreClient;
use taskdeck::poll::Poller;
use taskdeck_proto::alert::AlertKind;
use taskdeck_proto::api::CreateTaskRequest;
use taskdeck_proto::task::{TaskStatus, UserId};
use taskdeck_store::http::start_server;

const HOUR_MS: u64 = 60 * 60 * 1000;

async fn start_test_store() -> SocketAddr {
    let (addr, _handle) = start_server("127.0.0.1:0")
        .await
        .expect("failed to start test store");
    addr
}

fn wall_now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_millis(),
    )
    .expect("timestamp overflow")
}

fn make_request(assignee: UserId, title: &str, deadline: u64) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        description: "details".to_string(),
        assigned_to: assignee,
        assigned_by: UserId::new(),
        deadline,
    }
}

#[tokio::test]
async fn fresh_pending_task_notifies_once() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let now = wall_now_ms();

    client
        .create_task(&make_request(user, "Due soon", now + 2 * HOUR_MS))
        .await
        .unwrap();

    let mut poller = Poller::new(client, user);
    let outcome = poller.tick(now).await.unwrap();
    let kinds: Vec<AlertKind> = outcome.new_alerts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![AlertKind::NewAssignment, AlertKind::DeadlineApproaching]
    );
    assert_eq!(poller.registry().badge_count(), 2);

    // The 60-second poll cadence with unchanged state re-raises nothing.
    let outcome = poller.tick(now + 60_000).await.unwrap();
    assert!(outcome.new_alerts.is_empty());
    assert_eq!(poller.registry().badge_count(), 2);
}

#[tokio::test]
async fn overdue_task_raises_overdue_pair() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let now = wall_now_ms();

    let task = client
        .create_task(&make_request(user, "Slipped", now + HOUR_MS))
        .await
        .unwrap();
    client
        .update_status(task.id, TaskStatus::InProgress)
        .await
        .unwrap();

    let mut poller = Poller::new(client, user);

    // Before the deadline: only the approaching warning (not pending, so
    // no NewAssignment).
    let outcome = poller.tick(now).await.unwrap();
    let kinds: Vec<AlertKind> = outcome.new_alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::DeadlineApproaching]);

    // Two hours later the deadline has passed: the overdue pair is new.
    let outcome = poller.tick(now + 2 * HOUR_MS).await.unwrap();
    let kinds: Vec<AlertKind> = outcome.new_alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::Overdue, AlertKind::OverdueReminder]);
    assert_eq!(poller.registry().badge_count(), 3);
}

#[tokio::test]
async fn completing_a_task_silences_overdue() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let now = wall_now_ms();

    let task = client
        .create_task(&make_request(user, "Finished in time", now + HOUR_MS))
        .await
        .unwrap();
    client
        .update_status(task.id, TaskStatus::Completed)
        .await
        .unwrap();

    let mut poller = Poller::new(client, user);
    let outcome = poller.tick(now + 2 * HOUR_MS).await.unwrap();
    assert!(outcome.new_alerts.is_empty());
}

#[tokio::test]
async fn dismissal_does_not_unlatch() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let now = wall_now_ms();

    client
        .create_task(&make_request(user, "Noisy", now + 2 * HOUR_MS))
        .await
        .unwrap();

    let mut poller = Poller::new(client, user);
    let outcome = poller.tick(now).await.unwrap();
    assert_eq!(outcome.new_alerts.len(), 2);

    for alert in &outcome.new_alerts {
        assert!(poller.dismiss(&alert.key));
    }
    assert_eq!(poller.registry().badge_count(), 0);

    let outcome = poller.tick(now + 60_000).await.unwrap();
    assert!(outcome.new_alerts.is_empty());
    assert_eq!(poller.registry().badge_count(), 0);
}

#[tokio::test]
async fn tasks_for_other_users_stay_silent() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let other = UserId::new();
    let now = wall_now_ms();

    client
        .create_task(&make_request(other, "Someone else's", now + HOUR_MS))
        .await
        .unwrap();

    let mut poller = Poller::new(client, user);
    let outcome = poller.tick(now).await.unwrap();
    assert!(outcome.tasks.is_empty());
    assert!(outcome.new_alerts.is_empty());
}
