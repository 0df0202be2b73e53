//! Append-only CSV result log.
//!
//! Every append opens the file, writes exactly one row and closes it again,
//! so no handle is held across cycles and another program (a spreadsheet,
//! `tail -f`) may open the log while the monitor runs. Cost per append is
//! constant: prior rows are never read back or rewritten.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::storage::{Observation, StorageError};

/// Column headers, written once when the file is created or empty.
pub const HEADER: [&str; 4] = ["Timestamp", "Host", "Status", "Average Response Time (ms)"];

/// Default result log location.
pub const DEFAULT_LOG_PATH: &str = "ping_results.csv";

/// Durable, append-only log of observations.
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    /// Create a log handle. The file itself is created on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one observation as one row.
    ///
    /// The whole row (and the header, for a new file) is encoded in memory
    /// first and handed to the OS in a single append write, so a failed call
    /// leaves either a complete row or nothing.
    pub fn append(&self, observation: &Observation) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        let mut buf = Vec::with_capacity(128);
        if len > 0 && !ends_with_newline(&mut file, len)? {
            tracing::warn!(
                path = %self.path.display(),
                "Result log ends with a partial row, starting a new line"
            );
            buf.push(b'\n');
        }

        buf.extend_from_slice(&encode_row(observation, len == 0)?);
        file.write_all(&buf)?;
        file.sync_data()?;

        tracing::debug!(
            path = %self.path.display(),
            status = %observation.status,
            "Observation appended"
        );
        Ok(())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> Result<bool, StorageError> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn encode_row(observation: &Observation, with_header: bool) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if with_header {
        writer.write_record(HEADER)?;
    }
    writer.write_record([
        observation.formatted_timestamp(),
        observation.host.clone(),
        observation.status.to_string(),
        observation.latency_field(),
    ])?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| StorageError::Internal(e.to_string()))
}
