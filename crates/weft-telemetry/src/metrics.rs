//! The call-metrics sink.
//!
//! Every instrumented chain records the same triple per call: who called
//! (`caller`), what was called (`api`), and how it ended (`code`), as a
//! counter increment plus a latency observation in milliseconds.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `weft_calls_total` | Counter | `caller`, `api`, `code` |
//! | `weft_call_duration_milliseconds` | Histogram | `caller`, `api`, `code` |
//!
//! Consumers hold an `Arc<dyn CallMetrics>` passed in at construction.
//! [`PrometheusSink`] is the production implementation; [`RecordingSink`]
//! captures observations for tests.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use parking_lot::Mutex;
use std::time::Duration;

/// Sink for per-call instrumentation observations.
pub trait CallMetrics: Send + Sync {
    /// Records one completed call: counter increment plus a latency
    /// observation in milliseconds.
    fn record_call(&self, caller: &str, api: &str, code: &str, elapsed: Duration);
}

/// [`CallMetrics`] implementation emitting through the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusSink;

impl CallMetrics for PrometheusSink {
    fn record_call(&self, caller: &str, api: &str, code: &str, elapsed: Duration) {
        counter!(
            "weft_calls_total",
            "caller" => caller.to_string(),
            "api" => api.to_string(),
            "code" => code.to_string()
        )
        .increment(1);
        histogram!(
            "weft_call_duration_milliseconds",
            "caller" => caller.to_string(),
            "api" => api.to_string(),
            "code" => code.to_string()
        )
        .record(elapsed.as_secs_f64() * 1000.0);
    }
}

/// Handle to the installed Prometheus recorder.
///
/// Owning this handle is the recorder's lifecycle: it is created once at
/// startup by [`install_metrics`] and passed to whatever serves the scrape
/// endpoint.
#[derive(Debug)]
pub struct MetricsHandle {
    handle: PrometheusHandle,
}

impl MetricsHandle {
    /// Renders all metrics in Prometheus text exposition format.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Installs the Prometheus recorder and registers metric descriptions.
///
/// Fatal at setup time if a recorder is already installed.
pub fn install_metrics() -> TelemetryResult<MetricsHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    describe_counter!("weft_calls_total", "Total calls by caller, api and result code");
    describe_histogram!(
        "weft_call_duration_milliseconds",
        "Call latency in milliseconds by caller, api and result code"
    );

    Ok(MetricsHandle { handle })
}

/// One observation captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Caller label.
    pub caller: String,
    /// Api label.
    pub api: String,
    /// Result-code label.
    pub code: String,
    /// Observed latency.
    pub elapsed: Duration,
}

/// In-memory [`CallMetrics`] for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

impl CallMetrics for RecordingSink {
    fn record_call(&self, caller: &str, api: &str, code: &str, elapsed: Duration) {
        self.calls.lock().push(RecordedCall {
            caller: caller.to_string(),
            api: api.to_string(),
            code: code.to_string(),
            elapsed,
        });
    }
}
