//! The coordinator owning a fixed list of applications.
//!
//! # Responsibilities
//! - Hold the app list, fixed at construction
//! - Start all apps in order (`serve`)
//! - Stop all apps concurrently (`shutdown` and its reporting variants)
//!
//! # Design Decisions
//! - Apps are shared handles; the caller keeps its own clones and owns their lifetime
//! - `shutdown` has no error channel by contract; use `shutdown_with_report` to inspect outcomes
//! - Calling `serve` twice, or `shutdown` before `serve`, is not guarded against

use std::sync::Arc;
use std::time::Instant;

use crate::lifecycle::{startup, shutdown, App, Context, ShutdownReport, StartError};

/// Starts and stops a fixed set of applications.
pub struct Server {
    apps: Vec<Arc<dyn App>>,
}

impl Server {
    /// Create a server managing `apps` in the given order.
    pub fn new(apps: Vec<Arc<dyn App>>) -> Self {
        tracing::debug!(apps = apps.len(), "Server created");
        Self { apps }
    }

    /// The managed apps, in start order.
    pub fn apps(&self) -> &[Arc<dyn App>] {
        &self.apps
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Start every app sequentially, stopping at the first failure.
    ///
    /// Apps started before the failure are left running.
    pub async fn serve(&self) -> Result<(), StartError> {
        let started_at = Instant::now();
        tracing::info!(apps = self.apps.len(), "Starting apps");

        startup::start_all(&self.apps).await?;

        tracing::info!(
            apps = self.apps.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "All apps started"
        );
        Ok(())
    }

    /// Stop every app concurrently and wait for all of them.
    ///
    /// Individual failures are logged and otherwise ignored.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_with_report().await;
    }

    /// Same as [`Server::shutdown`], returning per-app outcomes.
    pub async fn shutdown_with_report(&self) -> ShutdownReport {
        self.shutdown_with_context(Context::background()).await
    }

    /// Stop every app with `ctx` as the shared scope.
    ///
    /// A deadline on `ctx` is forwarded to each app; the server still waits
    /// for every stop to return.
    pub async fn shutdown_with_context(&self, ctx: Context) -> ShutdownReport {
        let started_at = Instant::now();
        tracing::info!(
            apps = self.apps.len(),
            deadline_ms = ctx.remaining().map(|d| d.as_millis() as u64),
            "Stopping apps"
        );

        let report = shutdown::stop_all(&self.apps, ctx).await;

        let failed = report.failures().count();
        if failed > 0 {
            tracing::warn!(
                apps = report.len(),
                failed,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Shutdown complete with failures"
            );
        } else {
            tracing::info!(
                apps = report.len(),
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Shutdown complete"
            );
        }
        report
    }
}
