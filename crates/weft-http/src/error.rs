//! HTTP middleware error types.

use thiserror::Error;

/// Errors surfaced by HTTP transports and middleware.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The terminal round-trip failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid middleware configuration, fatal at setup time.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Underlying IO failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = HttpError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
