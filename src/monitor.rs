//! Sampling loop.
//!
//! [`Monitor`] owns everything that lives for the duration of a run: the
//! probe, the result log, the live view and the in-memory series. Each
//! cycle runs probe, parse, persist and render strictly in sequence, then
//! sleeps for the configured interval. Failures are contained within the
//! cycle that produced them; only the shutdown signal ends the loop, and it
//! is only observed between cycles.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tokio::sync::watch;

use crate::probe::{Probe, ProbeResult, parse_latency};
use crate::storage::{Observation, ResultLog, Status};
use crate::view::{LiveView, Series};

/// Fixed settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Target host.
    pub host: String,
    /// Result log path.
    pub log_file: PathBuf,
    /// Live view artifact path.
    pub artifact: PathBuf,
    /// Open the artifact in a browser once published.
    pub open_viewer: bool,
    /// Pause after each cycle.
    pub interval: Duration,
}

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// The observation handed to both sinks.
    pub observation: Observation,
    /// Whether the result log accepted the row.
    pub persisted: bool,
    /// Whether the live view was regenerated.
    pub rendered: bool,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    /// Completed cycles.
    pub cycles: u64,
    /// Cycles whose probe returned output.
    pub successes: u64,
    /// Cycles whose probe returned nothing usable.
    pub failures: u64,
    /// Successful cycles whose output held no recognised latency.
    pub unparsed: u64,
    /// Failed result log appends.
    pub store_errors: u64,
    /// Failed live view renders.
    pub render_errors: u64,
}

/// Drives the probe → parse → persist → render → sleep cycle.
pub struct Monitor<P> {
    ctx: RunContext,
    probe: P,
    log: ResultLog,
    view: LiveView,
    series: Series,
    stats: MonitorStats,
}

impl<P> std::fmt::Debug for Monitor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("ctx", &self.ctx)
            .field("points", &self.series.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<P: Probe> Monitor<P> {
    /// Create a monitor with an empty series.
    pub fn new(ctx: RunContext, probe: P) -> Self {
        let log = ResultLog::new(&ctx.log_file);
        let view = LiveView::new(&ctx.artifact, ctx.interval, ctx.open_viewer);
        Self {
            ctx,
            probe,
            log,
            view,
            series: Series::new(),
            stats: MonitorStats::default(),
        }
    }

    /// Observations of this run so far.
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Counters so far.
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Publish the empty live view before the first cycle.
    pub fn publish_initial(&mut self) {
        if let Err(e) = self.view.publish_initial(&self.ctx.host) {
            self.stats.render_errors += 1;
            tracing::error!(
                path = %self.view.path().display(),
                error = %e,
                "Failed to publish initial live view"
            );
        }
    }

    /// Run one cycle and hand its observation to both sinks.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let host = self.ctx.host.as_str();
        let started = Local::now();
        tracing::info!("Pinging {host}...");

        let observation = match self.probe.probe(host).await {
            ProbeResult::Raw(output) => {
                let latency = parse_latency(&output);
                match latency {
                    Some(ms) => tracing::info!("Ping successful. Average Response Time: {ms} ms"),
                    None => {
                        self.stats.unparsed += 1;
                        tracing::warn!(
                            host = %host,
                            "Ping successful. Average Response Time: unknown ms"
                        );
                    }
                }
                Observation::success(started, host, latency)
            }
            ProbeResult::Unreachable => {
                tracing::warn!("Ping failed for {host}");
                Observation::failure(started, host)
            }
        };

        match observation.status {
            Status::Success => self.stats.successes += 1,
            Status::Failure => self.stats.failures += 1,
        }

        let persisted = match self.log.append(&observation) {
            Ok(()) => true,
            Err(e) => {
                self.stats.store_errors += 1;
                tracing::error!(
                    path = %self.log.path().display(),
                    error = %e,
                    "Failed to append to result log"
                );
                false
            }
        };

        self.series.push(&observation);
        let rendered = match self.view.render(&self.series, &self.ctx.host) {
            Ok(()) => true,
            Err(e) => {
                self.stats.render_errors += 1;
                tracing::error!(
                    path = %self.view.path().display(),
                    error = %e,
                    "Failed to render live view"
                );
                false
            }
        };

        self.stats.cycles += 1;
        CycleReport {
            observation,
            persisted,
            rendered,
        }
    }

    /// Run cycles until `shutdown` turns `true`.
    ///
    /// The signal is checked before every cycle and raced against the
    /// post-cycle sleep, never against a cycle in progress, so a stop request
    /// cannot interrupt a row being written.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> MonitorStats {
        tracing::info!(
            host = %self.ctx.host,
            interval = %humantime::format_duration(self.ctx.interval),
            log_file = %self.ctx.log_file.display(),
            artifact = %self.ctx.artifact.display(),
            "Starting ping monitor, press Ctrl+C to stop"
        );
        self.publish_initial();

        loop {
            let stop = *shutdown.borrow();
            if stop {
                break;
            }

            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.ctx.interval) => {}
                _ = stop_requested(&mut shutdown) => break,
            }
        }

        tracing::info!(
            cycles = self.stats.cycles,
            successes = self.stats.successes,
            failures = self.stats.failures,
            unparsed = self.stats.unparsed,
            store_errors = self.stats.store_errors,
            render_errors = self.stats.render_errors,
            "Ping Tool stopped by user."
        );
        self.stats
    }
}

/// Install Ctrl+C and, on Unix, SIGTERM listeners.
///
/// The listeners are registered before this returns, so a signal that
/// arrives before the returned future is first polled is still caught
/// instead of killing the process.
#[cfg(unix)]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => tracing::info!("Received Ctrl+C signal"),
            _ = terminate.recv() => tracing::info!("Received terminate signal"),
        }
    })
}

/// Install the Ctrl+C listener.
#[cfg(not(unix))]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
        tracing::info!("Received Ctrl+C signal");
    })
}

/// Resolves once the flag is `true`; never resolves if the sender is gone.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Latency;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    /// Replays canned probe results in order, then reports unreachable.
    struct ScriptedProbe {
        results: Mutex<VecDeque<ProbeResult>>,
    }

    impl ScriptedProbe {
        fn new(results: impl IntoIterator<Item = ProbeResult>) -> Self {
            Self {
                results: Mutex::new(results.into_iter().collect()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Probe for ScriptedProbe {
        async fn probe(&self, _host: &str) -> ProbeResult {
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ProbeResult::Unreachable)
        }
    }

    fn context(dir: &TempDir) -> RunContext {
        RunContext {
            host: "example.com".to_string(),
            log_file: dir.path().join("results.csv"),
            artifact: dir.path().join("plot.html"),
            open_viewer: false,
            interval: Duration::from_secs(5),
        }
    }

    fn linux_summary(avg: &str) -> ProbeResult {
        ProbeResult::Raw(format!("rtt min/avg/max/mdev = 1.0/{avg}/9.0/0.5 ms\n"))
    }

    #[tokio::test]
    async fn test_cycle_success() {
        let dir = tempdir().unwrap();
        let mut monitor = Monitor::new(context(&dir), ScriptedProbe::new([linux_summary("4.5")]));

        let report = monitor.run_cycle().await;
        assert_eq!(report.observation.status, Status::Success);
        assert_eq!(report.observation.latency_ms, Some(Latency::Fractional(4.5)));
        assert!(report.persisted);
        assert!(report.rendered);
        assert_eq!(monitor.series().values(), &[Some(Latency::Fractional(4.5))]);
    }

    #[tokio::test]
    async fn test_cycle_unparseable_success() {
        let dir = tempdir().unwrap();
        let probe = ScriptedProbe::new([ProbeResult::Raw("garbage".to_string())]);
        let mut monitor = Monitor::new(context(&dir), probe);

        let report = monitor.run_cycle().await;
        assert_eq!(report.observation.status, Status::Success);
        assert!(report.observation.latency_ms.is_none());
        assert_eq!(monitor.stats().unparsed, 1);
        assert_eq!(monitor.stats().successes, 1);
    }

    #[tokio::test]
    async fn test_cycle_failure() {
        let dir = tempdir().unwrap();
        let mut monitor = Monitor::new(context(&dir), ScriptedProbe::new(Vec::new()));

        let report = monitor.run_cycle().await;
        assert_eq!(report.observation.status, Status::Failure);
        assert!(report.observation.latency_ms.is_none());
        assert_eq!(monitor.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_stop_series() {
        let dir = tempdir().unwrap();
        let mut ctx = context(&dir);
        ctx.log_file = dir.path().join("missing").join("results.csv");
        let mut monitor = Monitor::new(ctx, ScriptedProbe::new([linux_summary("2.0")]));

        let report = monitor.run_cycle().await;
        assert!(!report.persisted);
        assert!(report.rendered);
        assert_eq!(monitor.series().len(), 1);
        assert_eq!(monitor.stats().store_errors, 1);

        // The next cycle is an independent attempt.
        let report = monitor.run_cycle().await;
        assert!(!report.persisted);
        assert_eq!(monitor.series().len(), 2);
        assert_eq!(monitor.stats().store_errors, 2);
    }

    #[tokio::test]
    async fn test_render_failure_does_not_stop_store() {
        let dir = tempdir().unwrap();
        let mut ctx = context(&dir);
        ctx.artifact = dir.path().join("missing").join("plot.html");
        let log_file = ctx.log_file.clone();
        let mut monitor = Monitor::new(ctx, ScriptedProbe::new([linux_summary("2.0")]));

        let report = monitor.run_cycle().await;
        assert!(report.persisted);
        assert!(!report.rendered);
        assert_eq!(monitor.stats().render_errors, 1);
        assert_eq!(std::fs::read_to_string(log_file).unwrap().lines().count(), 2);
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_already_stopped() {
        let dir = tempdir().unwrap();
        let ctx = context(&dir);
        let artifact = ctx.artifact.clone();
        let log_file = ctx.log_file.clone();
        let monitor = Monitor::new(ctx, ScriptedProbe::new([linux_summary("2.0")]));

        let (_tx, rx) = watch::channel(true);
        let stats = monitor.run(rx).await;

        assert_eq!(stats.cycles, 0);
        assert!(artifact.exists());
        assert!(!log_file.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_during_sleep() {
        let dir = tempdir().unwrap();
        let ctx = context(&dir);
        let log_file = ctx.log_file.clone();
        let monitor = Monitor::new(
            ctx,
            ScriptedProbe::new([linux_summary("1.0"), linux_summary("2.0")]),
        );

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(monitor.run(rx));

        // Two cycles complete at t=0 and t=5s; stop while sleeping after the second.
        tokio::time::sleep(Duration::from_secs(7)).await;
        tx.send(true).unwrap();

        let stats = handle.await.unwrap();
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.successes, 2);

        // Header plus one row per completed cycle.
        let contents = std::fs::read_to_string(log_file).unwrap();
        let rows: Vec<&str> = contents.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].ends_with(",example.com,Success,1.0"));
        assert!(rows[2].ends_with(",example.com,Success,2.0"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shutdown_signal_catches_signal_sent_before_first_poll() {
        let signal = shutdown_signal().unwrap();

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), signal)
            .await
            .unwrap();
    }
}
