//! A background worker application.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::AppsConfig;
use crate::lifecycle::{App, BoxError, Context};

const MIN_TICK: Duration = Duration::from_millis(1);

/// Errors raised by [`WorkerApp`].
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker {0} is already running")]
    AlreadyStarted(String),

    /// The loop exited before reporting readiness.
    #[error("worker {0} exited before becoming ready")]
    ReadinessLost(String),

    #[error("worker {0} did not exit before the stop deadline")]
    StopTimedOut(String),

    #[error("worker {name} crashed: {reason}")]
    Crashed { name: String, reason: String },

    #[error("injected {0} failure")]
    Injected(&'static str),
}

/// Fault injection knobs.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub fail_start: bool,
    pub fail_stop: bool,
    /// Extra cleanup time spent in `stop` after the loop has exited.
    /// Running past the stop context's deadline fails with `StopTimedOut`.
    pub stop_delay: Duration,
}

struct RunningLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs a ticking loop on a background task between `start` and `stop`.
pub struct WorkerApp {
    name: String,
    tick: Duration,
    faults: Faults,
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    task: Mutex<Option<RunningLoop>>,
}

impl WorkerApp {
    pub fn new(name: impl Into<String>, tick: Duration) -> Self {
        Self {
            name: name.into(),
            tick: tick.max(MIN_TICK),
            faults: Faults::default(),
            running: Arc::new(AtomicBool::new(false)),
            ticks: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }

    /// Build `config.count` workers named `worker-<i>`.
    pub fn fleet(config: &AppsConfig) -> Vec<Arc<WorkerApp>> {
        (0..config.count)
            .map(|i| {
                let faults = Faults {
                    fail_start: config.fail_start_index == Some(i),
                    fail_stop: config.fail_stop_every > 0 && (i + 1) % config.fail_stop_every == 0,
                    stop_delay: Duration::from_millis(config.stop_delay_ms),
                };
                Arc::new(
                    WorkerApp::new(format!("worker-{i}"), Duration::from_millis(config.tick_ms))
                        .with_faults(faults),
                )
            })
            .collect()
    }

    /// Whether the loop is currently considered running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of ticks the loop has completed.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl App for WorkerApp {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), BoxError> {
        if self.faults.fail_start {
            return Err(WorkerError::Injected("start").into());
        }

        let mut slot = self.task.lock().await;
        if slot.is_some() {
            return Err(WorkerError::AlreadyStarted(self.name.clone()).into());
        }

        let cancel = CancellationToken::new();
        let (ready_tx, ready_rx) = oneshot::channel();

        let token = cancel.clone();
        let running = self.running.clone();
        let ticks = self.ticks.clone();
        let tick = self.tick;
        let name = self.name.clone();
        let handle = tokio::spawn(async move {
            running.store(true, Ordering::SeqCst);
            let _ = ready_tx.send(());
            tracing::debug!(app = %name, "Worker loop running");

            let mut ticker = tokio::time::interval(tick);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        ticks.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
            tracing::debug!(app = %name, "Worker loop exited");
        });

        if ready_rx.await.is_err() {
            return Err(WorkerError::ReadinessLost(self.name.clone()).into());
        }

        *slot = Some(RunningLoop { cancel, handle });
        Ok(())
    }

    async fn stop(&self, ctx: Context) -> Result<(), BoxError> {
        self.running.store(false, Ordering::SeqCst);
        let task = self.task.lock().await.take();

        if let Some(RunningLoop { cancel, mut handle }) = task {
            cancel.cancel();
            tokio::select! {
                biased;
                joined = &mut handle => {
                    if let Err(e) = joined {
                        return Err(WorkerError::Crashed {
                            name: self.name.clone(),
                            reason: e.to_string(),
                        }
                        .into());
                    }
                }
                _ = ctx.done() => {
                    handle.abort();
                    let _ = handle.await;
                    return Err(WorkerError::StopTimedOut(self.name.clone()).into());
                }
            }
        }

        if !self.faults.stop_delay.is_zero() {
            tokio::select! {
                biased;
                _ = tokio::time::sleep(self.faults.stop_delay) => {}
                _ = ctx.done() => {
                    return Err(WorkerError::StopTimedOut(self.name.clone()).into());
                }
            }
        }

        if self.faults.fail_stop {
            return Err(WorkerError::Injected("stop").into());
        }
        Ok(())
    }
}
