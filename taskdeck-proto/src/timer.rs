//! Timer state engine: the authoritative `Start`/`Stop` transition logic.
//!
//! [`apply_timer_action`] owns every mutation of a task's timer fields and
//! its append-only action history. It is a pure state transition over the
//! task record: the clock is injected, validation happens before any field
//! is touched, and persistence is left entirely to the caller.
//!
//! The guarded invariants:
//!
//! - at most one open timer window per task (`Start` on a running timer
//!   fails with [`TimerError::AlreadyRunning`]);
//! - `time_spent_secs` only grows, and only from a `Stop` that closes an
//!   open window (`Stop` without one fails with [`TimerError::NotRunning`],
//!   so replaying a `Stop` can never double-count);
//! - exactly one history entry per successful transition, none on failure.

use serde::{Deserialize, Serialize};

use crate::task::{ActionEntry, Task, TimerAction, UserId};

/// Errors from a rejected timer transition.
///
/// Both variants are state conflicts: the task is untouched and the caller
/// surfaces the condition as a user-visible no-op rather than retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// `Start` was requested while a timer window is already open.
    #[error("timer already started")]
    AlreadyRunning,
    /// `Stop` was requested with no open timer window.
    #[error("timer not started")]
    NotRunning,
}

/// Snapshot of the timer fields after a successful transition.
///
/// This is also the wire shape of the store's timer endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerUpdate {
    /// Accumulated work time in whole seconds.
    #[serde(rename = "timeSpent")]
    pub time_spent_secs: u64,
    /// Start of the open timer window, or `None` after a `Stop`.
    #[serde(rename = "timeStarted")]
    pub time_started_ms: Option<u64>,
    /// The full audit log including the entry this transition appended.
    pub action_history: Vec<ActionEntry>,
}

/// Applies a `Start` or `Stop` transition to a task's timer state.
///
/// On success the task's timer fields are updated, one [`ActionEntry`] is
/// appended, and a [`TimerUpdate`] snapshot of the new state is returned.
/// On failure the task is left exactly as it was.
///
/// Elapsed time for a `Stop` is `floor((now - started) / 1000)` seconds;
/// if clock skew makes `now` earlier than the recorded start, the elapsed
/// time is 0 rather than a decrement.
///
/// # Errors
///
/// [`TimerError::AlreadyRunning`] for a `Start` on an open window,
/// [`TimerError::NotRunning`] for a `Stop` without one.
pub fn apply_timer_action(
    task: &mut Task,
    action: TimerAction,
    actor: UserId,
    now_ms: u64,
) -> Result<TimerUpdate, TimerError> {
    match action {
        TimerAction::Start => {
            if task.time_started_ms.is_some() {
                return Err(TimerError::AlreadyRunning);
            }
            task.time_started_ms = Some(now_ms);
        }
        TimerAction::Stop => {
            let Some(started_ms) = task.time_started_ms else {
                return Err(TimerError::NotRunning);
            };
            let elapsed_secs = now_ms.saturating_sub(started_ms) / 1000;
            task.time_spent_secs += elapsed_secs;
            task.time_started_ms = None;
        }
    }

    task.action_history.push(ActionEntry {
        action,
        user_id: actor,
        timestamp: now_ms,
    });

    Ok(TimerUpdate {
        time_spent_secs: task.time_spent_secs,
        time_started_ms: task.time_started_ms,
        action_history: task.action_history.clone(),
    })
}
