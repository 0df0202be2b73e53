//! Storage Layer
//!
//! Durable, human-inspectable persistence of observations:
//!
//! - [`ResultLog`]: append-only CSV log, one row per sampling cycle
//! - [`Observation`] / [`Status`] / [`Latency`]: the records being stored
//! - [`StorageError`]: failures while appending

mod error;
pub mod result_log;
mod types;

pub use error::StorageError;
pub use result_log::{DEFAULT_LOG_PATH, HEADER, ResultLog};
pub use types::{Latency, MISSING_LATENCY, Observation, Status, TIMESTAMP_FORMAT};
