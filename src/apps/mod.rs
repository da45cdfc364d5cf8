//! Ready-made applications.
//!
//! # Responsibilities
//! - Provide `WorkerApp`, a background loop that honours the `App` contract
//! - Build a fleet of workers from configuration, with optional fault injection
//!
//! # Design Decisions
//! - `start` waits for the spawned loop to report readiness
//! - `stop` waits for the loop to exit, bounded by the stop context

pub mod worker;

pub use worker::{Faults, WorkerApp, WorkerError};
