//! Session-local alert registry.
//!
//! Holds the `seen` key set the derivation rules consult, plus the alerts
//! currently presented to the user. Dismissing an alert removes it from
//! the presented set but never from `seen` — once notified, a condition
//! only re-notifies if a state change produces a new distinct key.
//!
//! The registry lives for one client session and is never shared across
//! devices; the `seen` set grows without bound for the session.

use std::collections::HashSet;

use taskdeck_proto::alert::Alert;
use taskdeck_proto::task::Task;

use super::derive::derive_alerts;

/// Tracks raised alert keys and the currently presented alerts.
#[derive(Debug, Default)]
pub struct AlertRegistry {
    seen: HashSet<String>,
    active: Vec<Alert>,
}

impl AlertRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a freshly fetched task list through the derivation rules.
    ///
    /// Newly raised alerts are appended to the presented set and returned.
    pub fn observe(&mut self, tasks: &[Task], now_ms: u64) -> Vec<Alert> {
        let new_alerts = derive_alerts(tasks, now_ms, &mut self.seen);
        self.active.extend(new_alerts.iter().cloned());
        new_alerts
    }

    /// Dismisses a presented alert by key, returning whether it existed.
    ///
    /// The key stays in `seen`, so the same condition will not re-fire on
    /// the next poll.
    pub fn dismiss(&mut self, key: &str) -> bool {
        let before = self.active.len();
        self.active.retain(|a| a.key != key);
        self.active.len() != before
    }

    /// The alerts currently presented, oldest first.
    #[must_use]
    pub fn active(&self) -> &[Alert] {
        &self.active
    }

    /// Number of presented alerts (the bell badge count).
    #[must_use]
    pub fn badge_count(&self) -> usize {
        self.active.len()
    }

    /// Whether an alert with this key has ever been raised this session.
    #[must_use]
    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }
}
