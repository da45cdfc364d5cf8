//! Application lifecycle coordination.
//!
//! A [`Server`] owns a fixed list of [`App`]s. `serve` starts them one by one
//! in list order and stops at the first failure; `shutdown` stops all of them
//! concurrently and always completes.

pub mod apps;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod server;

pub use config::LifecycleConfig;
pub use lifecycle::{App, BoxError, Context, ShutdownReport, StartError};
pub use server::Server;
