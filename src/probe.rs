//! Probe Layer
//!
//! Reachability checks against the target host and extraction of the
//! average latency from their output.
//!
//! - [`Probe`]: core trait for anything that can check a host
//! - [`CommandProbe`]: runs the system `ping` utility
//! - [`parse_latency`]: reads the summary line of `ping` output
//!
//! # Error Handling Philosophy
//!
//! An unreachable host is an ordinary observation, not an error. Probes
//! therefore never return `Err`: a non-zero exit status and a failure to
//! launch the tool both collapse into [`ProbeResult::Unreachable`], and the
//! latter is only reported through logging. Likewise the parser returns
//! `None` for output it does not recognise.

pub mod command;
pub mod parser;

pub use command::{CommandProbe, DEFAULT_ATTEMPTS, PingFlavor, ProbeConfig};
pub use parser::parse_latency;

/// Raw outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The check completed successfully; captured standard output.
    Raw(String),
    /// No usable output (host down, tool missing, permission denied, ...).
    Unreachable,
}

/// A reachability check against a single host.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Check `host` once, blocking until the underlying check completes.
    async fn probe(&self, host: &str) -> ProbeResult;
}
