//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle operations produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (start/stop counters, stop latency histogram)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; the binary installs subscriber and exporter
//! - Log filter from RUST_LOG first, configured level second
//! - Metrics without an installed recorder are no-ops

pub mod logging;
pub mod metrics;
