//! Shared test applications.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use app_lifecycle::{App, BoxError, Context};
use async_trait::async_trait;

/// Tracks how many stops run at the same time.
#[derive(Default)]
pub struct Concurrency {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Concurrency {
    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Configurable app that records every call it receives.
pub struct ProbeApp {
    pub id: usize,
    name: String,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub saw_deadline: AtomicBool,
    /// Whether the stop context was cancelled once the stop delay elapsed.
    pub cancelled_after_delay: AtomicBool,
    start_log: Arc<Mutex<Vec<usize>>>,
    concurrency: Arc<Concurrency>,
    fail_start: bool,
    fail_stop: bool,
    panic_stop: bool,
    stop_delay: Duration,
}

impl ProbeApp {
    pub fn new(id: usize, start_log: Arc<Mutex<Vec<usize>>>, concurrency: Arc<Concurrency>) -> Self {
        Self {
            id,
            name: format!("probe-{id}"),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            saw_deadline: AtomicBool::new(false),
            cancelled_after_delay: AtomicBool::new(false),
            start_log,
            concurrency,
            fail_start: false,
            fail_stop: false,
            panic_stop: false,
            stop_delay: Duration::ZERO,
        }
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn panicking_stop(mut self) -> Self {
        self.panic_stop = true;
        self
    }

    pub fn stop_delay(mut self, delay: Duration) -> Self {
        self.stop_delay = delay;
        self
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl App for ProbeApp {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), BoxError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.start_log.lock().unwrap().push(self.id);
        // Yield so an accidental concurrent start would interleave.
        tokio::task::yield_now().await;
        if self.fail_start {
            return Err(format!("{} refused to start", self.name).into());
        }
        Ok(())
    }

    async fn stop(&self, ctx: Context) -> Result<(), BoxError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.saw_deadline.store(ctx.deadline().is_some(), Ordering::SeqCst);

        self.concurrency.enter();
        tokio::time::sleep(self.stop_delay).await;
        self.concurrency.exit();
        self.cancelled_after_delay.store(ctx.is_cancelled(), Ordering::SeqCst);

        if self.panic_stop {
            panic!("{} exploded during stop", self.name);
        }
        if self.fail_stop {
            return Err(format!("{} failed to release resources", self.name).into());
        }
        Ok(())
    }
}

/// A fleet of probes sharing one start log and concurrency tracker.
pub struct Probes {
    pub apps: Vec<Arc<ProbeApp>>,
    pub start_log: Arc<Mutex<Vec<usize>>>,
    pub concurrency: Arc<Concurrency>,
}

impl Probes {
    pub fn build(n: usize, configure: impl Fn(ProbeApp) -> ProbeApp) -> Self {
        let start_log = Arc::new(Mutex::new(Vec::new()));
        let concurrency = Arc::new(Concurrency::default());
        let apps = (0..n)
            .map(|id| {
                Arc::new(configure(ProbeApp::new(
                    id,
                    start_log.clone(),
                    concurrency.clone(),
                )))
            })
            .collect();
        Self {
            apps,
            start_log,
            concurrency,
        }
    }

    pub fn handles(&self) -> Vec<Arc<dyn App>> {
        self.apps
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn App>)
            .collect()
    }

    pub fn start_order(&self) -> Vec<usize> {
        self.start_log.lock().unwrap().clone()
    }
}

/// Increments on start, decrements on stop.
#[derive(Default)]
pub struct CounterApp {
    pub counter: AtomicI64,
}

#[async_trait]
impl App for CounterApp {
    async fn start(&self) -> Result<(), BoxError> {
        self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self, _ctx: Context) -> Result<(), BoxError> {
        self.counter.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
