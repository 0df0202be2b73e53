//! System `ping` probe.
//!
//! Runs the platform `ping` utility with a fixed packet count and captures
//! its standard output for the parser.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tokio::process::Command;

use crate::probe::{Probe, ProbeResult};

/// Default number of echo requests per cycle.
pub const DEFAULT_ATTEMPTS: u32 = 4;

/// Default probe executable.
pub const DEFAULT_PROGRAM: &str = "ping";

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_attempts() -> u32 {
    DEFAULT_ATTEMPTS
}

/// Command-line convention of the `ping` utility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PingFlavor {
    /// `ping -c <count> <host>` (Linux, BSD, macOS, BusyBox).
    Posix,
    /// `ping -n <count> <host>`.
    Windows,
}

impl PingFlavor {
    /// Flavor matching the build target.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Flag that sets the number of echo requests.
    pub fn count_flag(&self) -> &'static str {
        match self {
            Self::Posix => "-c",
            Self::Windows => "-n",
        }
    }
}

/// Configuration for the `ping` probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Executable to run (default: "ping").
    #[serde(default = "default_program")]
    pub program: String,
    /// Echo requests per cycle (default: 4).
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Argument convention (default: detected from the build target).
    #[serde(default)]
    pub flavor: Option<PingFlavor>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            attempts: DEFAULT_ATTEMPTS,
            flavor: None,
        }
    }
}

impl ProbeConfig {
    /// Set the executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the number of echo requests.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Force an argument convention.
    pub fn with_flavor(mut self, flavor: PingFlavor) -> Self {
        self.flavor = Some(flavor);
        self
    }
}

/// Probe backed by an external `ping` process.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    attempts: u32,
    flavor: PingFlavor,
}

impl CommandProbe {
    /// Create a probe from configuration.
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            program: config.program,
            attempts: config.attempts,
            flavor: config.flavor.unwrap_or_else(PingFlavor::current),
        }
    }

    /// Arguments passed to the executable for `host`.
    pub fn args(&self, host: &str) -> Vec<String> {
        vec![
            self.flavor.count_flag().to_string(),
            self.attempts.to_string(),
            host.to_string(),
        ]
    }
}

#[async_trait::async_trait]
impl Probe for CommandProbe {
    async fn probe(&self, host: &str) -> ProbeResult {
        let mut command = Command::new(&self.program);
        command.args(self.args(host)).kill_on_drop(true);
        let output = command.output().await;

        match output {
            Ok(output) if output.status.success() => {
                ProbeResult::Raw(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                tracing::debug!(
                    host = %host,
                    status = %output.status,
                    "Probe exited unsuccessfully"
                );
                ProbeResult::Unreachable
            }
            Err(e) => {
                tracing::warn!(
                    host = %host,
                    program = %self.program,
                    error = %e,
                    "Failed to run probe"
                );
                ProbeResult::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_probe_config_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.program, "ping");
        assert_eq!(config.attempts, 4);
        assert!(config.flavor.is_none());
    }

    #[test]
    fn test_probe_config_from_yaml() {
        let config: ProbeConfig = serde_yaml::from_str("flavor: windows\nattempts: 2").unwrap();
        assert_eq!(config.program, "ping");
        assert_eq!(config.attempts, 2);
        assert_eq!(config.flavor, Some(PingFlavor::Windows));
    }

    #[test]
    fn test_flavor_count_flags() {
        assert_eq!(PingFlavor::Posix.count_flag(), "-c");
        assert_eq!(PingFlavor::Windows.count_flag(), "-n");
        assert_eq!(PingFlavor::from_str("POSIX").unwrap(), PingFlavor::Posix);
    }

    #[test]
    fn test_args_layout() {
        let probe = CommandProbe::new(ProbeConfig::default().with_flavor(PingFlavor::Windows));
        assert_eq!(probe.args("example.com"), vec!["-n", "4", "example.com"]);

        let probe = CommandProbe::new(
            ProbeConfig::default()
                .with_flavor(PingFlavor::Posix)
                .with_attempts(2),
        );
        assert_eq!(probe.args("10.0.0.1"), vec!["-c", "2", "10.0.0.1"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_exit_returns_output() {
        let probe = CommandProbe::new(
            ProbeConfig::default()
                .with_program("echo")
                .with_flavor(PingFlavor::Posix),
        );
        let result = probe.probe("example.com").await;
        assert_eq!(result, ProbeResult::Raw("-c 4 example.com\n".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_unreachable() {
        let probe = CommandProbe::new(ProbeConfig::default().with_program("false"));
        assert_eq!(probe.probe("example.com").await, ProbeResult::Unreachable);
    }

    #[tokio::test]
    async fn test_missing_program_is_unreachable() {
        let probe =
            CommandProbe::new(ProbeConfig::default().with_program("pingscope-no-such-binary"));
        assert_eq!(probe.probe("example.com").await, ProbeResult::Unreachable);
    }
}
