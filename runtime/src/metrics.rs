//! Prometheus metrics for store activity.
//!
//! The store records through the `metrics` facade; without an installed
//! recorder every call is a no-op. [`MetricsRecorder`] installs a Prometheus
//! recorder and renders the collected values as text:
//!
//! - `store_dispatch_total`: committed dispatches
//! - `store_dispatch_failed_total`: dispatches rejected by the reducer or the
//!   reentrancy bound, labelled by `reason`
//! - `store_dispatch_duration_seconds`: reduce + commit + notify time
//! - `store_listeners`: listeners currently registered
//!
//! # Example
//!
//! ```rust,no_run
//! use unistore_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! // ... dispatch some actions ...
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installs a Prometheus recorder and renders its contents.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the global recorder.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Build`] if histogram buckets are rejected and
    /// [`MetricsError::Install`] if the recorder cannot be installed.
    ///
    /// # Note
    ///
    /// Only one global recorder can exist per process. If another one is
    /// already installed this logs a warning and returns `Ok`, leaving
    /// [`handle`](Self::handle) empty.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005,
                    0.01, 0.05, 0.1,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!(
                        "Metrics recorder already initialized, skipping re-initialization"
                    );
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this recorder was never installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!("store_dispatch_total", "Total number of committed dispatches");
    describe_counter!(
        "store_dispatch_failed_total",
        "Total number of dispatches that committed nothing"
    );
    describe_histogram!(
        "store_dispatch_duration_seconds",
        "Time taken to reduce, commit and notify listeners"
    );
    describe_gauge!("store_listeners", "Listeners currently registered");
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a committed dispatch.
    pub fn record_dispatch(store: &str, duration: Duration) {
        counter!("store_dispatch_total", "store" => store.to_owned()).increment(1);
        histogram!("store_dispatch_duration_seconds", "store" => store.to_owned())
            .record(duration.as_secs_f64());
    }

    /// Record a dispatch that committed nothing.
    pub fn record_failure(store: &str, reason: &'static str) {
        counter!("store_dispatch_failed_total", "store" => store.to_owned(), "reason" => reason)
            .increment(1);
    }

    /// Record the current number of listeners.
    #[allow(clippy::cast_precision_loss)] // listener counts are far below 2^52
    pub fn record_listeners(store: &str, count: usize) {
        gauge!("store_listeners", "store" => store.to_owned()).set(count as f64);
    }
}
