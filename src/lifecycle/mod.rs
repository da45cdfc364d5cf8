//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     app[0].start() → app[1].start() → ... → app[n-1].start()
//!     First failure → StartError (remaining apps never started)
//!
//! Shutdown (shutdown.rs):
//!     Root Context → spawn one stop task per app (fan-out)
//!     → join all tasks (fan-in) → ShutdownReport
//! ```
//!
//! # Design Decisions
//! - Ordered startup: list order may encode dependencies, so no concurrency
//! - Unordered shutdown: every app is stopped concurrently, even if it never started
//! - Stop failures and panics are absorbed; the caller only sees them via the opt-in report
//! - No coordinator timeout: a deadline travels in the `Context`, apps decide how to honour it

pub mod app;
pub mod context;
pub mod shutdown;
pub mod startup;

pub use app::{App, BoxError};
pub use context::Context;
pub use shutdown::{ShutdownReport, ShutdownSummary, StopFailure, StopOutcome};
pub use startup::StartError;
