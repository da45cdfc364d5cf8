//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,

    /// Worker fleet managed by the demo binary.
    pub apps: AppsConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Deadline handed to every app's stop, in milliseconds. 0 means none.
    pub stop_timeout_ms: u64,
}

impl ShutdownConfig {
    pub fn stop_timeout(&self) -> Option<Duration> {
        (self.stop_timeout_ms > 0).then(|| Duration::from_millis(self.stop_timeout_ms))
    }
}

/// Worker fleet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppsConfig {
    /// Number of workers.
    pub count: usize,

    /// Worker loop period in milliseconds.
    pub tick_ms: u64,

    /// Simulated cleanup time per worker stop, in milliseconds.
    pub stop_delay_ms: u64,

    /// Index of a worker whose start fails.
    pub fail_start_index: Option<usize>,

    /// Every n-th worker fails to stop. 0 disables.
    pub fail_stop_every: usize,
}

impl Default for AppsConfig {
    fn default() -> Self {
        Self {
            count: 3,
            tick_ms: 250,
            stop_delay_ms: 0,
            fail_start_index: None,
            fail_stop_every: 0,
        }
    }
}
