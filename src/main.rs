//! pingscope Binary Entry Point
//!
//! Resolves the target host, then runs the sampling loop until Ctrl+C.
//! Core functionality is provided by the `pingscope` library crate.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pingscope::{
    AppConfig, CommandProbe, Monitor,
    config::{parse_duration, validate_host},
    monitor::shutdown_signal,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pingscope - ping a host, log every result, chart it live
#[derive(Parser, Debug)]
#[command(name = "pingscope", version, about, long_about = None)]
struct Cli {
    /// IP address or domain to ping (prompted for when omitted)
    host: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "PINGSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Result log path (overrides config file)
    #[arg(long, env = "PINGSCOPE_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Live view artifact path (overrides config file)
    #[arg(long, env = "PINGSCOPE_ARTIFACT")]
    artifact: Option<PathBuf>,

    /// Pause between cycles, e.g. "5s" (overrides config file)
    #[arg(long, env = "PINGSCOPE_INTERVAL", value_parser = parse_duration)]
    interval: Option<Duration>,

    /// Do not open the live view in a browser
    #[arg(long, env = "PINGSCOPE_NO_OPEN")]
    no_open: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };

    // Apply CLI/env overrides (CLI > ENV > config file)
    if let Some(host) = cli.host {
        config.host = Some(host);
    }
    if let Some(path) = cli.log_file {
        config.store.path = path;
    }
    if let Some(path) = cli.artifact {
        config.view.path = path;
    }
    if let Some(interval) = cli.interval {
        config.interval = interval;
    }
    if cli.no_open {
        config.view.open = false;
    }
    config.validate()?;

    let host = match config.host.clone() {
        Some(host) => host,
        None => prompt_host().await?,
    };
    if host.trim().is_empty() {
        tracing::info!("No host provided. Exiting...");
        return Ok(());
    }
    let host = validate_host(&host)?;

    let ctx = config.run_context(&host)?;
    let monitor = Monitor::new(ctx, CommandProbe::new(config.probe.clone()));

    // Listeners are armed here, before the loop starts.
    let signal = shutdown_signal()?;
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        signal.await;
        let _ = stop_tx.send(true);
    });

    let stats = monitor.run(stop_rx).await;
    tracing::info!(
        "Run complete: {} cycles, {} successful, {} failed",
        stats.cycles,
        stats.successes,
        stats.failures
    );
    Ok(())
}

/// Ask the operator for the target host on stdin.
async fn prompt_host() -> std::io::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"Enter the IP or domain to ping (e.g., google.com, yahoo.com): ")
        .await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim().to_string())
}
