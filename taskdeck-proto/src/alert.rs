//! Derived alert types for deadline-relative notifications.
//!
//! Alerts are never persisted: the client derives them from the task list
//! and "now", and suppresses repeats via a session-local registry of alert
//! keys. The key scheme is deterministic per (task, kind) so repeated
//! derivation is idempotent:
//!
//! - `NewAssignment` is keyed by the bare task id (fires once ever per task),
//! - the other kinds append a `-deadline` / `-overdue` / `-reminder` suffix.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// The condition an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// A pending task was assigned to the user.
    NewAssignment,
    /// The deadline is less than 24 hours away.
    DeadlineApproaching,
    /// The deadline has passed and the task is not completed.
    Overdue,
    /// Companion nudge to an overdue task.
    OverdueReminder,
}

/// Display severity of an alert, for badge/row styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational.
    Info,
    /// Needs attention soon.
    Warning,
    /// Needs attention now.
    Error,
}

impl AlertKind {
    /// Deterministic suppression key for this kind on the given task.
    #[must_use]
    pub fn key(self, task_id: TaskId) -> String {
        match self {
            Self::NewAssignment => task_id.to_string(),
            Self::DeadlineApproaching => format!("{task_id}-deadline"),
            Self::Overdue => format!("{task_id}-overdue"),
            Self::OverdueReminder => format!("{task_id}-reminder"),
        }
    }

    /// How prominently the alert should be rendered.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::NewAssignment | Self::OverdueReminder => Severity::Info,
            Self::DeadlineApproaching => Severity::Warning,
            Self::Overdue => Severity::Error,
        }
    }
}

/// A derived, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Deterministic (task, kind) key used for suppression and dismissal.
    pub key: String,
    /// The condition being reported.
    pub kind: AlertKind,
    /// Task the alert refers to.
    pub task_id: TaskId,
    /// Short headline.
    pub title: String,
    /// Human-readable body naming the task.
    pub message: String,
}

impl Alert {
    /// Builds the alert for `kind` on `task`, with the standard wording.
    #[must_use]
    pub fn for_task(kind: AlertKind, task: &Task) -> Self {
        let (title, message) = match kind {
            AlertKind::NewAssignment => (
                "New task assigned".to_string(),
                format!("You have a new task: \"{}\"", task.title),
            ),
            AlertKind::DeadlineApproaching => (
                "Task deadline approaching".to_string(),
                format!("Your task \"{}\" is due soon", task.title),
            ),
            AlertKind::Overdue => (
                "Task overdue".to_string(),
                format!("Your task \"{}\" is overdue", task.title),
            ),
            AlertKind::OverdueReminder => (
                "Reminder to complete task".to_string(),
                format!("Please mark \"{}\" as completed", task.title),
            ),
        };
        Self {
            key: kind.key(task.id),
            kind,
            task_id: task.id,
            title,
            message,
        }
    }

    /// The alert's display severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }
}
