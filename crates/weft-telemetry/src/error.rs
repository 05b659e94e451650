//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur during telemetry setup.
///
/// These are configuration errors: fatal at startup, never silently
/// degraded at call time.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to install the metrics recorder.
    #[error("failed to install metrics recorder: {0}")]
    MetricsInit(String),

    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = TelemetryError::MetricsInit("already installed".to_string());
        assert_eq!(
            err.to_string(),
            "failed to install metrics recorder: already installed"
        );
    }
}
