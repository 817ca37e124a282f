//! Pure alert derivation rules.
//!
//! Evaluated per task, in presentation order:
//!
//! 1. `Pending` status → [`AlertKind::NewAssignment`], keyed by the task id
//!    alone, so it fires once ever per task.
//! 2. Deadline strictly less than 24 hours away (and still in the future)
//!    → [`AlertKind::DeadlineApproaching`].
//! 3. Deadline in the past with the task not `Completed` → both
//!    [`AlertKind::Overdue`] and [`AlertKind::OverdueReminder`].
//!
//! An alert is emitted only when its key is absent from `seen`; emission
//! inserts the key. Calling the function again with an unchanged task list
//! and clock therefore yields nothing — the suppression is a one-way latch
//! for the lifetime of the `seen` set. Tasks with no deadline or status
//! are skipped, never an error.

use std::collections::HashSet;

use taskdeck_proto::alert::{Alert, AlertKind};
use taskdeck_proto::task::{Task, TaskStatus};

/// Window before the deadline in which `DeadlineApproaching` fires (24 h).
pub const DEADLINE_WARNING_WINDOW_MS: u64 = 24 * 60 * 60 * 1000;

/// Derives the not-yet-seen alerts for `tasks` at time `now_ms`.
///
/// Every returned alert's key has been added to `seen`.
pub fn derive_alerts(tasks: &[Task], now_ms: u64, seen: &mut HashSet<String>) -> Vec<Alert> {
    let mut out = Vec::new();

    for task in tasks {
        let (Some(status), Some(deadline_ms)) = (task.status, task.deadline_ms) else {
            continue;
        };

        let mut emit = |kind: AlertKind, out: &mut Vec<Alert>| {
            let key = kind.key(task.id);
            if seen.insert(key) {
                out.push(Alert::for_task(kind, task));
            }
        };

        if status == TaskStatus::Pending {
            emit(AlertKind::NewAssignment, &mut out);
        }

        if deadline_ms > now_ms && deadline_ms - now_ms < DEADLINE_WARNING_WINDOW_MS {
            emit(AlertKind::DeadlineApproaching, &mut out);
        }

        if deadline_ms < now_ms && status != TaskStatus::Completed {
            emit(AlertKind::Overdue, &mut out);
            emit(AlertKind::OverdueReminder, &mut out);
        }
    }

    out
}
