//! Property-based tests for the timer engine.
//!
//! Uses proptest to verify, for arbitrary action sequences and clocks:
//! 1. Accumulated time never decreases.
//! 2. History grows by exactly one entry per successful transition and
//!    never on a failed one.
//! 3. A start/stop pair adds exactly `floor((t1 - t0) / 1000)` seconds.
//! 4. The timer window is open iff the last successful action was a start.
//! 5. Alert keys are injective over (task, kind).

use proptest::prelude::*;
use uuid::Uuid;

use taskdeck_proto::alert::AlertKind;
use taskdeck_proto::task::{Task, TaskId, TaskStatus, TimerAction, UserId};
use taskdeck_proto::timer::apply_timer_action;

/// Strategy for generating arbitrary `TimerAction` values.
fn arb_action() -> impl Strategy<Value = TimerAction> {
    prop_oneof![Just(TimerAction::Start), Just(TimerAction::Stop)]
}

/// Strategy for a sequence of actions with strictly increasing clocks.
///
/// Timestamps are bounded so the running sum can never overflow.
fn arb_action_sequence() -> impl Strategy<Value = Vec<(TimerAction, u64)>> {
    prop::collection::vec((arb_action(), 1..1_000_000u64), 0..32).prop_map(|steps| {
        let mut now = 0u64;
        steps
            .into_iter()
            .map(|(action, delta)| {
                now += delta;
                (action, now)
            })
            .collect()
    })
}

fn make_task() -> Task {
    Task {
        id: TaskId::new(),
        title: "property task".to_string(),
        description: String::new(),
        assigned_to: UserId::new(),
        assigned_by: UserId::new(),
        status: Some(TaskStatus::InProgress),
        deadline_ms: Some(u64::MAX),
        time_started_ms: None,
        time_spent_secs: 0,
        action_history: Vec::new(),
        created_at_ms: 0,
    }
}

proptest! {
    #[test]
    fn time_spent_never_decreases(steps in arb_action_sequence()) {
        let mut task = make_task();
        let actor = task.assigned_to;
        let mut last_spent = 0u64;
        for (action, now) in steps {
            let _ = apply_timer_action(&mut task, action, actor, now);
            prop_assert!(task.time_spent_secs >= last_spent);
            last_spent = task.time_spent_secs;
        }
    }

    #[test]
    fn history_grows_only_on_success(steps in arb_action_sequence()) {
        let mut task = make_task();
        let actor = task.assigned_to;
        for (action, now) in steps {
            let before = task.action_history.len();
            let result = apply_timer_action(&mut task, action, actor, now);
            let expected = if result.is_ok() { before + 1 } else { before };
            prop_assert_eq!(task.action_history.len(), expected);
        }
    }

    #[test]
    fn history_timestamps_are_monotone(steps in arb_action_sequence()) {
        let mut task = make_task();
        let actor = task.assigned_to;
        for (action, now) in steps {
            let _ = apply_timer_action(&mut task, action, actor, now);
        }
        for pair in task.action_history.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn start_stop_pair_adds_floored_elapsed(
        t0 in 0..1_000_000_000u64,
        delta in 0..100_000_000u64,
    ) {
        let mut task = make_task();
        let actor = task.assigned_to;
        let before = task.time_spent_secs;
        apply_timer_action(&mut task, TimerAction::Start, actor, t0)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        apply_timer_action(&mut task, TimerAction::Stop, actor, t0 + delta)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(task.time_spent_secs, before + delta / 1000);
        prop_assert_eq!(task.time_started_ms, None);
    }

    #[test]
    fn window_open_iff_last_success_was_start(steps in arb_action_sequence()) {
        let mut task = make_task();
        let actor = task.assigned_to;
        let mut last_success = None;
        for (action, now) in steps {
            if apply_timer_action(&mut task, action, actor, now).is_ok() {
                last_success = Some(action);
            }
        }
        prop_assert_eq!(
            task.timer_running(),
            last_success == Some(TimerAction::Start)
        );
    }

    #[test]
    fn failed_call_leaves_task_unchanged(steps in arb_action_sequence()) {
        let mut task = make_task();
        let actor = task.assigned_to;
        for (action, now) in steps {
            let snapshot = task.clone();
            if apply_timer_action(&mut task, action, actor, now).is_err() {
                prop_assert_eq!(&task, &snapshot);
            }
        }
    }

    #[test]
    fn alert_keys_are_injective(a in any::<u128>(), b in any::<u128>()) {
        let kinds = [
            AlertKind::NewAssignment,
            AlertKind::DeadlineApproaching,
            AlertKind::Overdue,
            AlertKind::OverdueReminder,
        ];
        let id_a = TaskId::from_uuid(Uuid::from_u128(a));
        let id_b = TaskId::from_uuid(Uuid::from_u128(b));
        for ka in kinds {
            for kb in kinds {
                if ka == kb && id_a == id_b {
                    prop_assert_eq!(ka.key(id_a), kb.key(id_b));
                } else {
                    prop_assert_ne!(ka.key(id_a), kb.key(id_b));
                }
            }
        }
    }
}
