//! Test helpers shared across crates.
//!
//! This crate provides a recording [`Executor`](domain_model::Executor) and
//! guards for installing it in the global registry.

pub mod database;
mod recording;

pub use recording::{Recorded, RecordingExecutor};
