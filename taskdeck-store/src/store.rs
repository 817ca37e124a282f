//! In-memory task store with per-task atomic timer mutation.
//!
//! [`TaskStore`] is the serialization point for concurrent requests: every
//! mutation runs under the map's write lock, so a timer transition always
//! observes the latest committed task state. Two racing `Start` calls on
//! the same task are applied in sequence and the second fails
//! `AlreadyRunning` instead of opening a duplicate window.

use std::collections::HashMap;

use tokio::sync::RwLock;

use taskdeck_proto::api::CreateTaskRequest;
use taskdeck_proto::task::{MAX_TASK_TITLE_LENGTH, Task, TaskId, TaskStatus, TimerAction, UserId};
use taskdeck_proto::timer::{self, TimerError, TimerUpdate};

/// Errors from store operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No task with the given id.
    #[error("task not found")]
    NotFound,
    /// Request failed validation before reaching the timer engine.
    #[error("{0}")]
    Invalid(String),
    /// The timer engine rejected the transition.
    #[error(transparent)]
    Timer(#[from] TimerError),
}

/// Thread-safe in-memory task map.
pub struct TaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
    max_title_len: usize,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store with the default title length limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_title_len(MAX_TASK_TITLE_LENGTH)
    }

    /// Creates an empty store with a custom title length limit.
    #[must_use]
    pub fn with_max_title_len(max_title_len: usize) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            max_title_len,
        }
    }

    /// Creates and stores a new task from a creation request.
    ///
    /// The task starts `Pending` with no open timer window, zero
    /// accumulated time, and an empty action history.
    ///
    /// # Errors
    ///
    /// [`StoreError::Invalid`] if the title or description is empty, or
    /// the title exceeds the configured length limit.
    pub async fn create(&self, req: &CreateTaskRequest, now_ms: u64) -> Result<Task, StoreError> {
        if req.title.is_empty() {
            return Err(StoreError::Invalid("title is required".to_string()));
        }
        if req.title.chars().count() > self.max_title_len {
            return Err(StoreError::Invalid(format!(
                "title too long (max {} characters)",
                self.max_title_len
            )));
        }
        if req.description.is_empty() {
            return Err(StoreError::Invalid("description is required".to_string()));
        }

        let task = Task {
            id: TaskId::new(),
            title: req.title.clone(),
            description: req.description.clone(),
            assigned_to: req.assigned_to,
            assigned_by: req.assigned_by,
            status: Some(TaskStatus::Pending),
            deadline_ms: Some(req.deadline),
            time_started_ms: None,
            time_spent_secs: 0,
            action_history: Vec::new(),
            created_at_ms: now_ms,
        };

        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    /// Returns all tasks assigned to `user`, ordered by creation time.
    pub async fn tasks_for_user(&self, user: UserId) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut out: Vec<Task> = tasks
            .values()
            .filter(|t| t.assigned_to == user)
            .cloned()
            .collect();
        out.sort_by_key(|t| t.created_at_ms);
        out
    }

    /// Returns a snapshot of a single task.
    pub async fn get(&self, task_id: TaskId) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(&task_id).cloned()
    }

    /// Updates a task's lifecycle status, returning the updated task.
    ///
    /// The deadline and timer fields are untouched; status transitions are
    /// unrestricted between the three states.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the task does not exist.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&task_id).ok_or(StoreError::NotFound)?;
        task.status = Some(status);
        Ok(task.clone())
    }

    /// Applies a timer transition under the write lock.
    ///
    /// The lock is held across read-modify-write, which gives the
    /// sequential-consistency guarantee the timer engine assumes: no two
    /// transitions on the same task interleave.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the task does not exist, or
    /// [`StoreError::Timer`] if the engine rejects the transition.
    pub async fn apply_timer(
        &self,
        task_id: TaskId,
        action: TimerAction,
        actor: UserId,
        now_ms: u64,
    ) -> Result<TimerUpdate, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&task_id).ok_or(StoreError::NotFound)?;
        let update = timer::apply_timer_action(task, action, actor, now_ms)?;
        Ok(update)
    }
}
