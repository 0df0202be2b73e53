//! Configuration validation utilities.

use std::time::Duration;

use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse YAML configuration.
    #[error("failed to parse YAML config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation failed.
    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Parse duration string using humantime.
///
/// Supports various formats: `5s`, `1m`, `1m30s`, `500ms`, etc.
///
/// # Examples
///
/// ```
/// use pingscope::config::parse_duration;
///
/// assert_eq!(parse_duration("5s").unwrap().as_secs(), 5);
/// assert_eq!(parse_duration("1m").unwrap().as_secs(), 60);
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("duration string is empty".to_string());
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Check a target host before it is handed to the probe as an argument.
///
/// Returns the trimmed host. Rejects empty input, embedded whitespace or
/// control characters, and a leading `-` that the probe would read as a flag.
pub fn validate_host(host: &str) -> Result<String, ConfigError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::ValidationError(
            "host must not be empty".to_string(),
        ));
    }
    if host.starts_with('-') {
        return Err(ConfigError::ValidationError(format!(
            "invalid host '{host}': must not start with '-'"
        )));
    }
    if host.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::ValidationError(format!(
            "invalid host '{host}': contains whitespace or control characters"
        )));
    }
    Ok(host.to_string())
}
