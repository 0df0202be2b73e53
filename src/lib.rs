//! pingscope - Single-Target Ping Monitor
//!
//! This crate provides the core of the `pingscope` tool: it pings one host
//! on a fixed cadence, appends every result to a CSV log and keeps a
//! self-refreshing HTML chart of the current run up to date. It can be used
//! as a library or run with the `pingscope` executable.
//!
//! # Architecture
//!
//! - **Probe**: runs the system `ping` and extracts the average latency
//! - **Storage**: append-only result log, one row per cycle
//! - **View**: in-memory series rendered to an auto-refreshing chart
//! - **Monitor**: the sampling loop tying the three together
//! - **Config**: YAML configuration and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use pingscope::{AppConfig, CommandProbe, Monitor};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let ctx = config.run_context("example.com")?;
//! let monitor = Monitor::new(ctx, CommandProbe::new(config.probe.clone()));
//!
//! let (_stop, shutdown) = tokio::sync::watch::channel(false);
//! let stats = monitor.run(shutdown).await;
//! println!("{} cycles", stats.cycles);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod monitor;
pub mod probe;
pub mod storage;
pub mod view;

pub use config::{AppConfig, ConfigError};
pub use monitor::{CycleReport, Monitor, MonitorStats, RunContext};
pub use probe::{CommandProbe, PingFlavor, Probe, ProbeConfig, ProbeResult, parse_latency};
pub use storage::{Latency, Observation, ResultLog, Status, StorageError};
pub use view::{LiveView, Series, ViewError};
