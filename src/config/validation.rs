//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and cross-field references
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LifecycleConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::LifecycleConfig;

const MAX_APPS: usize = 10_000;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("apps.count {0} exceeds the maximum of {max}", max = MAX_APPS)]
    TooManyApps(usize),

    #[error("apps.tick_ms must be greater than 0")]
    ZeroTick,

    #[error("apps.fail_start_index {index} is out of range for {count} app(s)")]
    FailStartOutOfRange { index: usize, count: usize },
}

pub fn validate_config(config: &LifecycleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = &config.observability.log_level;
    if level.trim().is_empty() || EnvFilter::try_new(level).is_err() {
        errors.push(ValidationError::LogLevel(level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.apps.count > MAX_APPS {
        errors.push(ValidationError::TooManyApps(config.apps.count));
    }

    if config.apps.tick_ms == 0 {
        errors.push(ValidationError::ZeroTick);
    }

    if let Some(index) = config.apps.fail_start_index {
        if index >= config.apps.count {
            errors.push(ValidationError::FailStartOutOfRange {
                index,
                count: config.apps.count,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&LifecycleConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = LifecycleConfig::default();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-address".into();
        config.apps.count = MAX_APPS + 1;
        config.apps.tick_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MetricsAddress("not-an-address".into()),
                ValidationError::TooManyApps(MAX_APPS + 1),
                ValidationError::ZeroTick,
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = LifecycleConfig::default();
        config.observability.metrics_address = "garbage".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_fail_start_index_out_of_range() {
        let mut config = LifecycleConfig::default();
        config.apps.count = 2;
        config.apps.fail_start_index = Some(2);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::FailStartOutOfRange { index: 2, count: 2 }]
        );
    }

    #[test]
    fn test_empty_log_level_rejected() {
        let mut config = LifecycleConfig::default();
        config.observability.log_level = "  ".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::LogLevel("  ".into())]
        );
    }
}
