//! Startup orchestration.
//!
//! # Responsibilities
//! - Start every app in list order, one at a time
//! - Stop at the first failure and report which app failed
//!
//! # Design Decisions
//! - Fail fast: apps after the failing one are never started
//! - No rollback: already started apps keep running until the caller shuts down
//! - The app's own error is kept verbatim as the error source

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::lifecycle::app::{App, BoxError};
use crate::observability::metrics;

/// An app failed to start.
#[derive(Debug, Error)]
#[error("failed to start app #{index} ({name}): {source}")]
pub struct StartError {
    /// Position of the failing app in the server's list.
    pub index: usize,
    /// Name reported by the failing app.
    pub name: String,
    #[source]
    source: BoxError,
}

impl StartError {
    /// The error returned by the app, unchanged.
    pub fn app_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn into_source(self) -> BoxError {
        self.source
    }
}

/// Start `apps` sequentially, returning the first failure.
pub async fn start_all(apps: &[Arc<dyn App>]) -> Result<(), StartError> {
    for (index, app) in apps.iter().enumerate() {
        let started_at = Instant::now();
        tracing::debug!(index, app = app.name(), "Starting app");

        if let Err(source) = app.start().await {
            metrics::record_start(false, started_at);
            tracing::error!(index, app = app.name(), error = %source, "App failed to start");
            return Err(StartError {
                index,
                name: app.name().to_string(),
                source,
            });
        }

        metrics::record_start(true, started_at);
        tracing::debug!(
            index,
            app = app.name(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "App started"
        );
    }

    Ok(())
}
