//! Prometheus metrics registry for reorganization runs.
//!
//! # Design
//! - A single registry per process, cloned cheaply through an `Arc`.
//! - Counters only; runs are short-lived and gauges would not outlive them.

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

/// Prometheus-backed metrics registry shared across the engine and the CLI.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    phases_total: IntCounterVec,
    files_total: IntCounterVec,
    identifier_rewrites_total: IntCounter,
    runs_total: IntCounterVec,
}

/// Snapshot of selected counters for reporting.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Files rewritten during identifier passes.
    pub identifier_rewrites_total: u64,
    /// Runs that completed.
    pub runs_completed: u64,
    /// Runs that aborted before mutating the filesystem.
    pub runs_failed: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let phases_total = IntCounterVec::new(
            Opts::new(
                "reorg_phases_total",
                "Reorganization phases executed by status",
            ),
            &["phase", "status"],
        )?;
        let files_total = IntCounterVec::new(
            Opts::new("reorg_files_total", "Worklist entries processed by outcome"),
            &["action", "outcome"],
        )?;
        let identifier_rewrites_total = IntCounter::with_opts(Opts::new(
            "reorg_identifier_rewrites_total",
            "Copied files whose identifiers were rewritten",
        ))?;
        let runs_total = IntCounterVec::new(
            Opts::new("reorg_runs_total", "Reorganization runs by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(phases_total.clone()))?;
        registry.register(Box::new(files_total.clone()))?;
        registry.register(Box::new(identifier_rewrites_total.clone()))?;
        registry.register(Box::new(runs_total.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                phases_total,
                files_total,
                identifier_rewrites_total,
                runs_total,
            }),
        })
    }

    /// Increment the phase counter.
    pub fn inc_phase(&self, phase: &str, status: &str) {
        self.inner
            .phases_total
            .with_label_values(&[phase, status])
            .inc();
    }

    /// Increment the per-file counter for an action and its outcome.
    pub fn inc_file(&self, action: &str, outcome: &str) {
        self.inner
            .files_total
            .with_label_values(&[action, outcome])
            .inc();
    }

    /// Increment the rewritten-copy counter.
    pub fn inc_identifier_rewrite(&self) {
        self.inner.identifier_rewrites_total.inc();
    }

    /// Increment the run counter (`completed` or `failed`).
    pub fn inc_run(&self, outcome: &str) {
        self.inner.runs_total.with_label_values(&[outcome]).inc();
    }

    /// Read the current value of the per-file counter.
    #[must_use]
    pub fn file_count(&self, action: &str, outcome: &str) -> u64 {
        self.inner
            .files_total
            .with_label_values(&[action, outcome])
            .get()
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the run counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            identifier_rewrites_total: self.inner.identifier_rewrites_total.get(),
            runs_completed: self.inner.runs_total.with_label_values(&["completed"]).get(),
            runs_failed: self.inner.runs_total.with_label_values(&["failed"]).get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_render_and_snapshot() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_phase("transfer", "completed");
        metrics.inc_file("copy", "ok");
        metrics.inc_file("copy", "ok");
        metrics.inc_identifier_rewrite();
        metrics.inc_run("completed");

        assert_eq!(metrics.file_count("copy", "ok"), 2);
        assert_eq!(metrics.file_count("move", "ok"), 0);

        let rendered = metrics.render()?;
        assert!(rendered.contains("reorg_phases_total"));
        assert!(rendered.contains("reorg_files_total"));
        assert!(rendered.contains("reorg_identifier_rewrites_total 1"));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.identifier_rewrites_total, 1);
        assert_eq!(snapshot.runs_completed, 1);
        assert_eq!(snapshot.runs_failed, 0);
        Ok(())
    }

    #[test]
    fn clones_share_one_registry() -> Result<()> {
        let metrics = Metrics::new()?;
        let clone = metrics.clone();
        clone.inc_file("move", "failed");
        assert_eq!(metrics.file_count("move", "failed"), 1);
        Ok(())
    }
}
