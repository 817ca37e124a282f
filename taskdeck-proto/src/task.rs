//! Task model for `TaskDeck`.
//!
//! Defines the task record shared by the store and the client: assignment
//! references, lifecycle status, the deadline, and the timer fields
//! (`time_started_ms`, `time_spent_secs`, `action_history`) that the timer
//! engine in [`crate::timer`] mutates. All timestamps are milliseconds since
//! the Unix epoch; accumulated work time is whole seconds. JSON field names
//! follow the store's camelCase wire format.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Opaque reference to a user identity.
///
/// User records (name, role, ...) are owned by the identity provider;
/// `TaskDeck` only carries the reference and never resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a fresh user reference.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `UserId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Assigned but not yet picked up.
    Pending,
    /// Actively being worked on.
    InProgress,
    /// Done; overdue alerting is suppressed for completed tasks.
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A timer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerAction {
    /// Open a work session on the task.
    Start,
    /// Close the open work session and accumulate elapsed time.
    Stop,
}

impl std::fmt::Display for TimerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// One entry in a task's append-only timer audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry {
    /// Which transition occurred.
    pub action: TimerAction,
    /// Who performed it.
    pub user_id: UserId,
    /// When it occurred (milliseconds since epoch).
    pub timestamp: u64,
}

/// A task assigned to a user, with deadline and timer state.
///
/// `status` and `deadline_ms` are always populated by the store; they are
/// optional here so that records from an older or foreign store deserialize
/// instead of failing, and the alert derivation engine skips such records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier (UUID v7, time-ordered).
    pub id: TaskId,
    /// Short title shown in lists and alerts.
    pub title: String,
    /// Longer free-form description.
    pub description: String,
    /// Who the task is assigned to.
    pub assigned_to: UserId,
    /// Who assigned it.
    pub assigned_by: UserId,
    /// Lifecycle status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Deadline in milliseconds since epoch. Immutable post-creation.
    #[serde(rename = "deadline", default)]
    pub deadline_ms: Option<u64>,
    /// Start of the open timer window, if one is active.
    #[serde(rename = "timeStarted", default)]
    pub time_started_ms: Option<u64>,
    /// Accumulated work time in whole seconds. Only ever increases.
    #[serde(rename = "timeSpent", default)]
    pub time_spent_secs: u64,
    /// Append-only audit log of timer transitions, in chronological order.
    #[serde(default)]
    pub action_history: Vec<ActionEntry>,
    /// When the task was created (milliseconds since epoch).
    #[serde(rename = "createdAt")]
    pub created_at_ms: u64,
}

impl Task {
    /// Returns `true` iff a timer window is currently open on this task.
    #[must_use]
    pub const fn timer_running(&self) -> bool {
        self.time_started_ms.is_some()
    }
}
