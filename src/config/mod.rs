//! Configuration module for pingscope.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Target host and sampling interval
//! - Probe settings (program, attempts, argument convention)
//! - Result log and live view locations

mod app;
mod validation;

pub use app::{AppConfig, StoreConfig, ViewConfig};
pub use validation::{ConfigError, parse_duration, validate_host};

// Re-export constants
pub use app::{DEFAULT_INTERVAL, MIN_INTERVAL};
