//! Deadline-relative alert derivation for `TaskDeck`.
//!
//! [`derive_alerts`] is a pure function of the task list, "now", and a set
//! of already-raised alert keys; [`AlertRegistry`] carries that set (and
//! the currently presented alerts) across polls within a session, so
//! repeated evaluation never re-notifies.

pub mod derive;
pub mod registry;

pub use derive::{DEADLINE_WARNING_WINDOW_MS, derive_alerts};
pub use registry::AlertRegistry;
