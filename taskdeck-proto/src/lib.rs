//! Shared data model and pure engines for `TaskDeck`.

pub mod alert;
pub mod api;
pub mod task;
pub mod timer;
