//! Live View Layer
//!
//! Keeps the in-memory series of the current run and publishes it as a
//! self-refreshing HTML chart.
//!
//! - [`Series`]: parallel timestamp/latency sequences, one entry per cycle
//! - [`LiveView`]: renders the whole series to the artifact file each cycle

pub mod live;

pub use live::{DEFAULT_ARTIFACT_PATH, LiveView, ViewError, render_page};

use crate::storage::{Latency, Observation};

/// Observations of the current run in plotting order.
///
/// Timestamps and values are kept as two sequences of equal length; a
/// missing latency is kept as `None` so that it is drawn as a gap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    timestamps: Vec<String>,
    values: Vec<Option<Latency>>,
}

impl Series {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation.
    pub fn push(&mut self, observation: &Observation) {
        self.timestamps.push(observation.formatted_timestamp());
        self.values.push(observation.latency_ms);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether no cycle has completed yet.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// X-axis values.
    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    /// Y-axis values.
    pub fn values(&self) -> &[Option<Latency>] {
        &self.values
    }
}
