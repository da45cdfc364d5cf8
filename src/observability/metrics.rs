//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lifecycle_app_starts_total` (counter): app starts by outcome
//! - `lifecycle_app_start_duration_seconds` (histogram): time spent in `start`
//! - `lifecycle_app_stops_total` (counter): app stops by outcome
//! - `lifecycle_app_stop_duration_seconds` (histogram): time until each stop task finished

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

fn outcome_label(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Record one app start attempt.
pub fn record_start(ok: bool, started_at: Instant) {
    ::metrics::counter!("lifecycle_app_starts_total", "outcome" => outcome_label(ok)).increment(1);
    ::metrics::histogram!("lifecycle_app_start_duration_seconds")
        .record(started_at.elapsed().as_secs_f64());
}

/// Record one app stop.
pub fn record_stop(ok: bool, elapsed: Duration) {
    ::metrics::counter!("lifecycle_app_stops_total", "outcome" => outcome_label(ok)).increment(1);
    ::metrics::histogram!("lifecycle_app_stop_duration_seconds").record(elapsed.as_secs_f64());
}
