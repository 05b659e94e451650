//! RPC error types.

use thiserror::Error;

/// Errors surfaced by RPC invocations and interceptors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The remote peer reported a status failure.
    #[error("rpc status {code}: {message}")]
    Status {
        /// Stable numeric status code.
        code: i32,
        /// Status detail from the peer.
        message: String,
    },

    /// The call never completed: connection, encoding or routing failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RpcError {
    /// The numeric code used as the `code` metrics label.
    ///
    /// Transport failures report the conventional unknown-failure code 2.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Status { code, .. } => *code,
            Self::Transport(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_is_reported() {
        let err = RpcError::Status { code: 5, message: "not found".to_string() };
        assert_eq!(err.code(), 5);
        assert_eq!(err.to_string(), "rpc status 5: not found");
    }

    #[test]
    fn transport_maps_to_unknown() {
        assert_eq!(RpcError::Transport("refused".to_string()).code(), 2);
    }
}
