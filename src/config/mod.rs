//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → LifecycleConfig (validated, immutable)
//!     → observability setup, worker fleet, shutdown deadline
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - CLI overrides are applied before a second validation pass

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppsConfig, LifecycleConfig, ObservabilityConfig, ShutdownConfig};
pub use validation::{validate_config, ValidationError};
