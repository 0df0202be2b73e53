//! Auto-refreshing HTML chart.
//!
//! The artifact is regenerated in full on every render and carries a
//! `<meta http-equiv="refresh">` directive matching the sampling interval,
//! so an open browser tab follows the run without any client-side state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use askama::Template;
use serde_json::json;
use thiserror::Error;

use crate::view::Series;

/// Default artifact location.
pub const DEFAULT_ARTIFACT_PATH: &str = "temp_plot.html";

/// Plotly bundle loaded by the artifact.
const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Trace and y-axis label.
const RESPONSE_TIME_LABEL: &str = "Response Time (ms)";

/// Errors that can occur while publishing the chart.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Artifact could not be written or replaced.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Chart page template.
#[derive(Template)]
#[template(path = "live_view.html")]
struct LiveViewTemplate<'a> {
    title: &'a str,
    refresh_secs: u64,
    plotly_src: &'a str,
    figure: String,
}

/// Render the chart page for `series` without touching the filesystem.
pub fn render_page(series: &Series, host: &str, refresh: Duration) -> Result<String, ViewError> {
    let title = format!("Real-Time Ping Monitoring for {host}");
    let figure = json!({
        "data": [{
            "type": "scatter",
            "mode": "lines+markers",
            "name": RESPONSE_TIME_LABEL,
            "x": series.timestamps(),
            "y": series.values(),
        }],
        "layout": {
            "title": { "text": title },
            "xaxis": { "title": { "text": "Timestamp" } },
            "yaxis": { "title": { "text": RESPONSE_TIME_LABEL } },
        },
    });

    let page = LiveViewTemplate {
        title: &title,
        refresh_secs: refresh_secs(refresh),
        plotly_src: PLOTLY_SRC,
        figure: script_safe(&figure.to_string()),
    };
    Ok(page.render()?)
}

/// Whole seconds for the refresh directive, rounded up, at least 1.
fn refresh_secs(refresh: Duration) -> u64 {
    let secs = refresh.as_secs() + u64::from(refresh.subsec_nanos() > 0);
    secs.max(1)
}

/// Keep JSON embedded in a `<script>` block from closing it early.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}

/// Publishes the series as an HTML file and opens it once per run.
#[derive(Debug)]
pub struct LiveView {
    path: PathBuf,
    refresh: Duration,
    open: bool,
    opened: bool,
}

impl LiveView {
    /// Create a view writing to `path`, refreshing every `refresh`.
    ///
    /// When `open` is set, the first successful render launches the
    /// default browser on the artifact.
    pub fn new(path: impl AsRef<Path>, refresh: Duration, open: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            refresh,
            open,
            opened: false,
        }
    }

    /// Path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Publish an empty chart so the operator has something to watch
    /// before the first cycle completes.
    pub fn publish_initial(&mut self, host: &str) -> Result<(), ViewError> {
        self.render(&Series::new(), host)
    }

    /// Regenerate the artifact from the full series.
    ///
    /// The page is written to a sibling file and renamed over the artifact;
    /// on failure the previous page stays in place.
    pub fn render(&mut self, series: &Series, host: &str) -> Result<(), ViewError> {
        let page = render_page(series, host, self.refresh)?;
        self.write_atomic(page.as_bytes())?;
        tracing::debug!(path = %self.path.display(), points = series.len(), "Live view updated");

        if !self.opened {
            self.opened = true;
            if self.open {
                self.open_viewer();
            }
        }
        Ok(())
    }

    fn write_atomic(&self, contents: &[u8]) -> Result<(), ViewError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, contents)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn open_viewer(&self) {
        let target = std::fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        match webbrowser::open(&target.to_string_lossy()) {
            Ok(()) => tracing::info!(path = %target.display(), "Opened live view"),
            Err(e) => tracing::warn!(
                path = %target.display(),
                error = %e,
                "Could not open live view, open it manually"
            ),
        }
    }
}
