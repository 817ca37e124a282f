//! End-to-end timer flow through the client against an in-process store.
//!
//! Exercises the `StoreClient` error mapping the UI layer branches on:
//! state conflicts come back as typed `AlreadyRunning` / `NotRunning`
//! values, unknown tasks as `NotFound`, and a dead store as a transient
//! transport error.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::time::Duration;

use taskdeck::client::{ClientError, StoreClient, TaskSource};
use taskdeck_proto::api::CreateTaskRequest;
use taskdeck_proto::task::{Task, TaskId, TaskStatus, TimerAction, UserId};
use taskdeck_store::http::start_server;

async fn start_test_store() -> SocketAddr {
    let (addr, _handle) = start_server("127.0.0.1:0")
        .await
        .expect("failed to start test store");
    addr
}

fn make_request(assignee: UserId) -> CreateTaskRequest {
    CreateTaskRequest {
        title: "Rotate the on-call schedule".to_string(),
        description: "Next quarter".to_string(),
        assigned_to: assignee,
        assigned_by: UserId::new(),
        deadline: 1_900_000_000_000,
    }
}

#[tokio::test]
async fn create_fetch_and_run_timer() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();

    let task = client.create_task(&make_request(user)).await.unwrap();
    assert_eq!(task.status, Some(TaskStatus::Pending));

    let update = client
        .update_timer(task.id, TimerAction::Start, user)
        .await
        .unwrap();
    assert!(update.time_started_ms.is_some());
    assert_eq!(update.action_history.len(), 1);

    // Let a little wall time pass so the stop has something to floor.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let update = client
        .update_timer(task.id, TimerAction::Stop, user)
        .await
        .unwrap();
    assert_eq!(update.time_started_ms, None);
    assert_eq!(update.action_history.len(), 2);

    // The fetched task reflects the committed timer state.
    let tasks: Vec<Task> = client.fetch_tasks(user).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(!tasks[0].timer_running());
    assert_eq!(tasks[0].action_history.len(), 2);
}

#[tokio::test]
async fn double_start_maps_to_already_running() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let task = client.create_task(&make_request(user)).await.unwrap();

    client
        .update_timer(task.id, TimerAction::Start, user)
        .await
        .unwrap();
    let err = client
        .update_timer(task.id, TimerAction::Start, user)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AlreadyRunning));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn stop_without_start_maps_to_not_running() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let task = client.create_task(&make_request(user)).await.unwrap();

    let err = client
        .update_timer(task.id, TimerAction::Stop, user)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotRunning));
}

#[tokio::test]
async fn unknown_task_maps_to_not_found() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));

    let err = client
        .update_timer(TaskId::new(), TimerAction::Start, UserId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound));

    let err = client
        .update_status(TaskId::new(), TaskStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
}

#[tokio::test]
async fn status_update_through_client() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let task = client.create_task(&make_request(user)).await.unwrap();

    let updated = client
        .update_status(task.id, TaskStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(updated.status, Some(TaskStatus::InProgress));

    let updated = client
        .update_status(task.id, TaskStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated.status, Some(TaskStatus::Completed));
}

#[tokio::test]
async fn dead_store_is_transient() {
    let addr = start_test_store().await;
    let client = StoreClient::new(&format!("http://{addr}"));
    let user = UserId::new();
    let task = client.create_task(&make_request(user)).await.unwrap();

    // A fresh store on a new port has no such task; but a port nobody
    // listens on at all yields a transport error the poller retries.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe port");
    let dead_addr = listener.local_addr().expect("probe addr");
    drop(listener);

    let dead = StoreClient::new(&format!("http://{dead_addr}"));
    let err = dead
        .update_timer(task.id, TimerAction::Start, user)
        .await
        .unwrap_err();
    assert!(err.is_transient());
}
