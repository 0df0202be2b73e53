//! Core data types shared by the result log and the live view.
//!
//! - [`Observation`]: the outcome of one sampling cycle
//! - [`Status`]: whether the probe produced usable output
//! - [`Latency`]: an average round-trip time in the precision the probe reported

use std::fmt;

use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Timestamp layout used by the result log and the chart axis.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder written to the result log when no latency is known.
pub const MISSING_LATENCY: &str = "N/A";

/// Outcome of a probe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
pub enum Status {
    /// The probe completed and returned output.
    Success,
    /// The host was unreachable or the probe could not be run.
    #[serde(rename = "Failed")]
    #[strum(serialize = "Failed")]
    Failure,
}

/// Average round-trip time in milliseconds.
///
/// Windows `ping` reports whole milliseconds while the POSIX tools report
/// fractional values. Both are kept as reported so that no rounding is
/// introduced between the probe output and what is logged or plotted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Latency {
    /// Whole milliseconds (`Average = 42ms`).
    Whole(u64),
    /// Fractional milliseconds (`rtt min/avg/max/mdev = 10/42.5/90/1.2 ms`).
    Fractional(f64),
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(ms) => write!(f, "{ms}"),
            // `{:?}` keeps a trailing `.0` on whole-valued floats.
            Self::Fractional(ms) => write!(f, "{ms:?}"),
        }
    }
}

/// The structured record of one sampling cycle.
///
/// Build with [`Observation::success`] or [`Observation::failure`]; a failed
/// observation never carries a latency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Wall-clock time at cycle start, truncated to whole seconds.
    pub timestamp: DateTime<Local>,
    /// Target host, fixed for the whole run.
    pub host: String,
    /// Probe outcome.
    pub status: Status,
    /// Average latency. `None` on failure, or on success when the summary
    /// line could not be parsed.
    pub latency_ms: Option<Latency>,
}

impl Observation {
    /// Probe returned output; `latency_ms` is whatever the parser found.
    pub fn success(
        timestamp: DateTime<Local>,
        host: impl Into<String>,
        latency_ms: Option<Latency>,
    ) -> Self {
        Self {
            timestamp: truncate_to_seconds(timestamp),
            host: host.into(),
            status: Status::Success,
            latency_ms,
        }
    }

    /// Probe produced no usable output.
    pub fn failure(timestamp: DateTime<Local>, host: impl Into<String>) -> Self {
        Self {
            timestamp: truncate_to_seconds(timestamp),
            host: host.into(),
            status: Status::Failure,
            latency_ms: None,
        }
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`].
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Latency as written to the result log.
    pub fn latency_field(&self) -> String {
        self.latency_ms
            .map(|l| l.to_string())
            .unwrap_or_else(|| MISSING_LATENCY.to_string())
    }
}

fn truncate_to_seconds(ts: DateTime<Local>) -> DateTime<Local> {
    ts.with_nanosecond(0).unwrap_or(ts)
}
