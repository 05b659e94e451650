//! Reply values and the cache error taxonomy.

use bytes::Bytes;
use thiserror::Error;

/// Errors carried in replies or surfaced by the pool.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A reply was requested with nothing pending and nothing buffered.
    #[error("pipeline queue empty")]
    EmptyPipeline,

    /// The verb is not a known command. Distinct from transport failures
    /// and surfaced synchronously, before anything reaches the wire.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The connection or protocol failed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// A single protocol reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Simple status line, e.g. `OK`.
    Status(String),
    /// Integer reply.
    Integer(i64),
    /// Bulk byte string.
    Bulk(Bytes),
    /// Null bulk reply.
    Nil,
    /// Array of nested replies.
    Multi(Vec<Reply>),
    /// Error reply.
    Error(CacheError),
}

impl Reply {
    /// True when this reply is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The error carried by this reply, if any.
    #[must_use]
    pub fn error(&self) -> Option<&CacheError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}
