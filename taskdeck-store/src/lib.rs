//! `TaskDeck` Task Store library.
//!
//! Exposes the store server for use in tests and embedding. The server
//! holds tasks in memory, applies timer transitions atomically per task,
//! and serves the JSON API the polling client consumes.

pub mod config;
pub mod http;
pub mod store;
