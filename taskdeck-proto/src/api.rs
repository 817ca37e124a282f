//! Wire payloads for the task store HTTP API.
//!
//! All bodies are JSON with camelCase field names. The timer request
//! carries its ids and action as raw strings so the store can report
//! malformed input as a 400 `invalidRequest` instead of a generic
//! deserialization failure, mirroring the validation-before-engine split:
//! only a request that parses cleanly ever reaches the timer engine.

use serde::{Deserialize, Serialize};

use crate::task::{TaskId, TaskStatus, TimerAction, UserId};

/// URL path prefix for all task endpoints.
pub const TASKS_PATH: &str = "/tasks";

/// Machine-readable error discriminant carried alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// Malformed or missing fields; not retried.
    InvalidRequest,
    /// `Start` on a task whose timer is already running.
    AlreadyRunning,
    /// `Stop` on a task with no running timer.
    NotRunning,
    /// Task does not exist.
    NotFound,
}

/// JSON error body returned by the store on 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description.
    pub error: String,
    /// Machine-readable discriminant, so clients branch without string
    /// matching.
    pub code: ErrorCode,
}

impl ErrorBody {
    /// Builds an error body from a code and message.
    #[must_use]
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Short title; required, at most 256 characters.
    pub title: String,
    /// Longer description; required.
    pub description: String,
    /// Assignee.
    pub assigned_to: UserId,
    /// Assigner.
    pub assigned_by: UserId,
    /// Deadline in milliseconds since epoch; immutable once set.
    pub deadline: u64,
}

/// Body of `PUT /tasks/{taskId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// The new lifecycle status.
    pub status: TaskStatus,
}

/// Body of `PUT /tasks/{taskId}/timer`, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRequest {
    /// Task id as a string; must match the path segment.
    #[serde(default)]
    pub task_id: String,
    /// `"start"` or `"stop"`.
    #[serde(default)]
    pub action: String,
    /// Acting user id as a string.
    #[serde(default)]
    pub user_id: String,
}

impl TimerRequest {
    /// Validates the raw fields into typed values.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first invalid field.
    pub fn validate(&self) -> Result<(TaskId, TimerAction, UserId), String> {
        if self.task_id.is_empty() || self.action.is_empty() || self.user_id.is_empty() {
            return Err("missing required fields".to_string());
        }
        let task_id: TaskId = self
            .task_id
            .parse()
            .map_err(|_| "invalid task or user id".to_string())?;
        let user_id: UserId = self
            .user_id
            .parse()
            .map_err(|_| "invalid task or user id".to_string())?;
        let action = match self.action.as_str() {
            "start" => TimerAction::Start,
            "stop" => TimerAction::Stop,
            _ => return Err("invalid action, must be \"start\" or \"stop\"".to_string()),
        };
        Ok((task_id, action, user_id))
    }
}
