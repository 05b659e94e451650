//! # Weft Telemetry
//!
//! The metrics sink consumed by Weft's chain instrumentation, plus logging
//! bootstrap. Instrumentation middleware receives an explicit
//! `Arc<dyn CallMetrics>` handle at construction; there are no package-level
//! mutable singletons to initialize behind a consumer's back.

#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{install_metrics, CallMetrics, MetricsHandle, PrometheusSink, RecordingSink};

/// Result type alias using [`TelemetryError`].
pub type TelemetryResult<T> = Result<T, TelemetryError>;
