//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Resolve the log filter from the environment or configuration

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use tracing_subscriber::util::TryInitError;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: &str) -> String {
    format!("app_lifecycle={level},lifecycle_demo={level}")
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = default_filter("debug");
        assert_eq!(filter, "app_lifecycle=debug,lifecycle_demo=debug");
        assert!(EnvFilter::try_new(&filter).is_ok());
    }
}
