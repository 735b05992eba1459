//! Prometheus metrics for pairdesk.
//!
//! Covers:
//! - Submission outcomes per flow
//! - Submission round-trip latency
//! - Gate state as seen by the ticker
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric names,
//! which is a programming error caught on first use.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use pairdesk_core::{GateState, SubmissionKind};
use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};

/// Total submission attempts by flow and outcome.
/// Labels: kind (bid/ask), outcome
pub static SUBMISSIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pairdesk_submissions_total",
        "Total submission attempts by outcome",
        &["kind", "outcome"]
    )
    .unwrap()
});

/// Round-trip time of submissions that reached the API.
pub static SUBMISSION_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "pairdesk_submission_latency_ms",
        "Submission round-trip latency in milliseconds",
        &["kind"],
        vec![25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Gate ticks by observed state.
pub static GATE_TICKS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pairdesk_gate_ticks_total",
        "Gate recomputations by observed state",
        &["state"]
    )
    .unwrap()
});

/// Gate state (1 = open).
pub static GATE_OPEN: Lazy<Gauge> =
    Lazy::new(|| register_gauge!("pairdesk_gate_open", "Submission gate state (1=open)").unwrap());

/// Seconds until the next window opens (0 while open).
pub static GATE_COUNTDOWN_SECONDS: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "pairdesk_gate_countdown_seconds",
        "Seconds until the next submission window opens"
    )
    .unwrap()
});

/// Metrics recording facade.
pub struct Metrics;

impl Metrics {
    /// Record a submission outcome (`succeeded`, `failed`, `rejected_*`, `busy`).
    pub fn submission(kind: SubmissionKind, outcome: &str) {
        SUBMISSIONS_TOTAL
            .with_label_values(&[kind.as_str(), outcome])
            .inc();
    }

    /// Record submission round-trip latency.
    pub fn submission_latency(kind: SubmissionKind, latency_ms: f64) {
        SUBMISSION_LATENCY_MS
            .with_label_values(&[kind.as_str()])
            .observe(latency_ms);
    }

    /// Record one gate recomputation.
    pub fn gate_tick(state: &GateState) {
        let label = if state.is_open { "open" } else { "closed" };
        GATE_TICKS_TOTAL.with_label_values(&[label]).inc();
        GATE_OPEN.set(if state.is_open { 1.0 } else { 0.0 });
        GATE_COUNTDOWN_SECONDS.set(state.countdown.as_secs() as f64);
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
