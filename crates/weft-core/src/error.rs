//! The service error envelope.
//!
//! [`ServiceError`] is the application-level error carried through RPC
//! responses and rendered as JSON at the HTTP edge. The `message` field is
//! the user-facing, localized text; `description` is internal detail. The
//! enrichment consumers fill in `message` only when it is absent; the code
//! is never altered by any layer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Sentinel used when message lookup yields nothing.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Resolves an error code to a localized message for the given language
/// preference list. Returns `None` when no message is known.
pub type MessageLookup = Arc<dyn Fn(i32, &[String]) -> Option<String> + Send + Sync>;

/// Structured application error with a stable code, a user-facing message,
/// and an internal description.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}, {description}")]
pub struct ServiceError {
    /// Stable numeric error code.
    pub code: i32,
    /// User-facing, localized message. Filled by enrichment when empty.
    #[serde(default)]
    pub message: String,
    /// Internal detail, not intended for end users.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ServiceError {
    /// Creates an error with a code and internal description, no message.
    #[must_use]
    pub fn new(code: i32, description: impl Into<String>) -> Self {
        Self {
            code,
            message: String::new(),
            description: description.into(),
        }
    }

    /// Sets the user-facing message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Fills in `message` if (and only if) it is empty, resolving through
    /// `lookup` with the given language preference; falls back to
    /// [`UNKNOWN_ERROR_MESSAGE`] when the lookup also comes up empty.
    pub fn ensure_message(&mut self, lookup: &MessageLookup, languages: &[String]) {
        if !self.message.is_empty() {
            return;
        }
        match lookup(self.code, languages) {
            Some(msg) if !msg.is_empty() => self.message = msg,
            _ => self.message = UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}
