//! Application configuration structures.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::monitor::RunContext;
use crate::probe::ProbeConfig;
use crate::storage::DEFAULT_LOG_PATH;
use crate::view::DEFAULT_ARTIFACT_PATH;

use super::validation::{ConfigError, validate_host};

// =============================================================================
// Constants
// =============================================================================

/// Default pause between cycles (5 seconds).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Minimum allowed pause between cycles (1 second).
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

fn default_open() -> bool {
    true
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Result log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Result log path (default: "ping_results.csv").
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

// =============================================================================
// View Configuration
// =============================================================================

/// Live view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Artifact path (default: "temp_plot.html").
    #[serde(default = "default_artifact_path")]
    pub path: PathBuf,

    /// Open the artifact in the default browser on start (default: true).
    #[serde(default = "default_open")]
    pub open: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            path: default_artifact_path(),
            open: true,
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target host. Prompted for when absent.
    #[serde(default)]
    pub host: Option<String>,

    /// Pause after each cycle, also the artifact refresh cadence (default: 5s).
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    /// Probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Result log settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Live view settings.
    #[serde(default)]
    pub view: ViewConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: None,
            interval: DEFAULT_INTERVAL,
            probe: ProbeConfig::default(),
            store: StoreConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval < MIN_INTERVAL {
            return Err(ConfigError::ValidationError(format!(
                "interval must be at least {}",
                humantime::format_duration(MIN_INTERVAL)
            )));
        }

        if self.probe.attempts == 0 {
            return Err(ConfigError::ValidationError(
                "probe attempts must be positive".to_string(),
            ));
        }

        if self.probe.program.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "probe program must not be empty".to_string(),
            ));
        }

        if self.store.path.as_os_str().is_empty() || self.view.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "store and view paths must not be empty".to_string(),
            ));
        }

        if self.store.path == self.view.path {
            return Err(ConfigError::ValidationError(format!(
                "store and view must use different files: '{}'",
                self.store.path.display()
            )));
        }

        if let Some(host) = &self.host {
            validate_host(host)?;
        }

        Ok(())
    }

    /// Freeze the configuration into the context of one run.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if `host` is not usable.
    pub fn run_context(&self, host: &str) -> Result<RunContext, ConfigError> {
        Ok(RunContext {
            host: validate_host(host)?,
            log_file: self.store.path.clone(),
            artifact: self.view.path.clone(),
            open_viewer: self.view.open,
            interval: self.interval,
        })
    }
}
