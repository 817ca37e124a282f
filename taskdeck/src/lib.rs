//! `TaskDeck` — task assignment tracker client library.

pub mod alerts;
pub mod client;
pub mod config;
pub mod poll;
