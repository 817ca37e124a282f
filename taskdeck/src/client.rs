//! HTTP client for the task store.
//!
//! [`StoreClient`] wraps a `reqwest` client around the store's JSON API.
//! The poller depends on the narrower [`TaskSource`] trait rather than the
//! concrete client, so tests drive it with an in-memory source and no
//! network.

use std::collections::HashMap;

use taskdeck_proto::api::{CreateTaskRequest, ErrorBody, ErrorCode, TimerRequest};
use taskdeck_proto::task::{Task, TaskId, TaskStatus, TimerAction, UserId};
use taskdeck_proto::timer::TimerUpdate;

/// Errors surfaced by task store calls.
///
/// `Transport` is the only transient variant: the poller retries it on the
/// next tick. Everything else is definite and surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The store rejected the request as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// `Start` on a task whose timer is already running.
    #[error("timer already started")]
    AlreadyRunning,
    /// `Stop` on a task with no running timer.
    #[error("timer not started")]
    NotRunning,
    /// The task does not exist on the store.
    #[error("task not found")]
    NotFound,
    /// The store could not be reached or answered unintelligibly.
    #[error("task store unreachable: {0}")]
    Transport(String),
}

impl ClientError {
    /// Whether the error is worth retrying on the next poll tick.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Anything that can produce the current task list for a user.
///
/// The seam between the poller and the network: production code uses
/// [`StoreClient`], tests use an in-memory fake.
pub trait TaskSource {
    /// Fetches the tasks currently assigned to `user`.
    fn fetch_tasks(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Task>, ClientError>> + Send;
}

/// HTTP client bound to one task store base URL.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Creates a client for the store at `base_url` (e.g.
    /// `http://127.0.0.1:7070`). A trailing slash is tolerated.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a new task on the store.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidRequest`] if the store rejects the payload,
    /// [`ClientError::Transport`] if the store is unreachable.
    pub async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task, ClientError> {
        let url = format!("{}/tasks", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(transport)?;
        decode_response(response).await
    }

    /// Updates a task's lifecycle status.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] if the task is unknown,
    /// [`ClientError::Transport`] if the store is unreachable.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, ClientError> {
        let url = format!("{}/tasks/{task_id}", self.base_url);
        let mut body = HashMap::new();
        body.insert("status", status);
        let response = self
            .http
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        decode_response(response).await
    }

    /// Applies a `Start`/`Stop` timer transition on the store.
    ///
    /// # Errors
    ///
    /// [`ClientError::AlreadyRunning`] / [`ClientError::NotRunning`] on a
    /// state conflict (a user-visible no-op, not retried),
    /// [`ClientError::NotFound`] if the task is unknown,
    /// [`ClientError::Transport`] if the store is unreachable.
    pub async fn update_timer(
        &self,
        task_id: TaskId,
        action: TimerAction,
        user: UserId,
    ) -> Result<TimerUpdate, ClientError> {
        let url = format!("{}/tasks/{task_id}/timer", self.base_url);
        let req = TimerRequest {
            task_id: task_id.to_string(),
            action: action.to_string(),
            user_id: user.to_string(),
        };
        let response = self
            .http
            .put(&url)
            .json(&req)
            .send()
            .await
            .map_err(transport)?;
        decode_response(response).await
    }
}

impl TaskSource for StoreClient {
    async fn fetch_tasks(&self, user: UserId) -> Result<Vec<Task>, ClientError> {
        let url = format!("{}/tasks/{user}", self.base_url);
        let response = self.http.get(&url).send().await.map_err(transport)?;
        decode_response(response).await
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

/// Decodes a store response: 2xx bodies into `T`, error bodies into the
/// matching [`ClientError`] variant via their machine-readable code.
async fn decode_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(transport);
    }

    let fallback = match status.as_u16() {
        404 => ClientError::NotFound,
        400 => ClientError::InvalidRequest(format!("store returned {status}")),
        _ => ClientError::Transport(format!("store returned {status}")),
    };

    match response.json::<ErrorBody>().await {
        Ok(body) => Err(match body.code {
            ErrorCode::InvalidRequest => ClientError::InvalidRequest(body.error),
            ErrorCode::AlreadyRunning => ClientError::AlreadyRunning,
            ErrorCode::NotRunning => ClientError::NotRunning,
            ErrorCode::NotFound => ClientError::NotFound,
        }),
        Err(_) => Err(fallback),
    }
}
