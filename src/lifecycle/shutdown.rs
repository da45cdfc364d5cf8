//! Shutdown coordination.
//!
//! Every app gets its own task calling `stop` with a clone of one shared
//! `Context`. All tasks are joined before returning, whatever their outcome.

use futures_util::future::join_all;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinError;

use crate::lifecycle::app::{App, BoxError};
use crate::lifecycle::context::Context;
use crate::observability::metrics;

/// Why a single app failed to stop.
#[derive(Debug, Error)]
pub enum StopFailure {
    /// `stop` returned an error.
    #[error("stop failed: {0}")]
    Failed(#[source] BoxError),

    /// `stop` panicked.
    #[error("stop panicked: {0}")]
    Panicked(String),

    /// The stop task was cancelled by the runtime before finishing.
    #[error("stop task cancelled")]
    Cancelled,
}

impl StopFailure {
    fn from_join_error(err: JoinError) -> Self {
        if err.is_panic() {
            StopFailure::Panicked(panic_message(err.into_panic()))
        } else {
            StopFailure::Cancelled
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Outcome of stopping one app.
#[derive(Debug)]
pub struct StopOutcome {
    pub index: usize,
    pub name: String,
    /// Time from spawning the stop task until it finished.
    pub elapsed: Duration,
    pub result: Result<(), StopFailure>,
}

impl StopOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-app outcomes of one shutdown, in list order.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    outcomes: Vec<StopOutcome>,
}

impl ShutdownReport {
    pub fn outcomes(&self) -> &[StopOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<StopOutcome> {
        self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes whose stop did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &StopOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// True when every app stopped cleanly.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Serializable view for printing.
    pub fn summary(&self) -> ShutdownSummary {
        let apps: Vec<AppSummary> = self
            .outcomes
            .iter()
            .map(|o| AppSummary {
                index: o.index,
                name: o.name.clone(),
                elapsed_ms: u64::try_from(o.elapsed.as_millis()).unwrap_or(u64::MAX),
                error: o.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();

        ShutdownSummary {
            total: apps.len(),
            failed: apps.iter().filter(|a| a.error.is_some()).count(),
            apps,
        }
    }
}

/// Printable shutdown summary.
#[derive(Debug, Clone, Serialize)]
pub struct ShutdownSummary {
    pub total: usize,
    pub failed: usize,
    pub apps: Vec<AppSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppSummary {
    pub index: usize,
    pub name: String,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

impl fmt::Display for ShutdownSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "stopped {} app(s), {} failed", self.total, self.failed)?;
        for app in &self.apps {
            match &app.error {
                None => writeln!(
                    f,
                    "  #{} {} ok ({} ms)",
                    app.index, app.name, app.elapsed_ms
                )?,
                Some(e) => writeln!(
                    f,
                    "  #{} {} FAILED ({} ms): {}",
                    app.index, app.name, app.elapsed_ms, e
                )?,
            }
        }
        Ok(())
    }
}

/// Stop every app concurrently and wait for all of them.
///
/// Never fails and never panics: errors and panics from individual apps end
/// up in the report. If an app's stop never returns, neither does this.
pub async fn stop_all(apps: &[Arc<dyn App>], ctx: Context) -> ShutdownReport {
    if apps.is_empty() {
        return ShutdownReport::default();
    }

    let pending: Vec<_> = apps
        .iter()
        .enumerate()
        .map(|(index, app)| {
            let name = app.name().to_string();
            let app = Arc::clone(app);
            let scope = ctx.clone();
            let spawned_at = Instant::now();
            let handle = tokio::spawn(async move { app.stop(scope).await });

            async move {
                let result = match handle.await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(source)) => Err(StopFailure::Failed(source)),
                    Err(join_err) => Err(StopFailure::from_join_error(join_err)),
                };
                StopOutcome {
                    index,
                    name,
                    elapsed: spawned_at.elapsed(),
                    result,
                }
            }
        })
        .collect();

    let outcomes = join_all(pending).await;

    for outcome in &outcomes {
        metrics::record_stop(outcome.is_ok(), outcome.elapsed);
        match &outcome.result {
            Ok(()) => tracing::debug!(
                index = outcome.index,
                app = %outcome.name,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "App stopped"
            ),
            Err(e) => tracing::warn!(
                index = outcome.index,
                app = %outcome.name,
                error = %e,
                "App failed to stop cleanly"
            ),
        }
    }

    ShutdownReport { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42u32)), "non-string panic payload");
    }

    #[test]
    fn test_summary_counts_failures() {
        let report = ShutdownReport {
            outcomes: vec![
                StopOutcome {
                    index: 0,
                    name: "db".into(),
                    elapsed: Duration::from_millis(12),
                    result: Ok(()),
                },
                StopOutcome {
                    index: 1,
                    name: "cache".into(),
                    elapsed: Duration::from_millis(3),
                    result: Err(StopFailure::Failed("flush failed".into())),
                },
            ],
        };

        assert!(!report.is_clean());
        assert_eq!(report.failures().count(), 1);

        let summary = report.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.apps[1].error.as_deref(), Some("stop failed: flush failed"));

        let text = summary.to_string();
        assert!(text.contains("stopped 2 app(s), 1 failed"));
        assert!(text.contains("#0 db ok (12 ms)"));
        assert!(text.contains("#1 cache FAILED"));
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = ShutdownReport::default();
        assert!(report.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.summary().total, 0);
    }
}
