//! JSON rendering of service errors at the HTTP edge.

use crate::types::{json_response, Response};
use weft_core::lang::languages;
use weft_core::{CallContext, MessageLookup, ServiceError};

/// Renders [`ServiceError`] values as JSON envelopes, enriching the
/// user-facing message through a lookup table first.
///
/// The HTTP status stays `200 OK`: the application error code travels inside
/// the envelope, not on the transport.
pub struct JsonRenderer {
    lookup: MessageLookup,
}

impl JsonRenderer {
    /// Creates a renderer resolving messages through `lookup`.
    #[must_use]
    pub fn new(lookup: MessageLookup) -> Self {
        Self { lookup }
    }

    /// Enriches `err` for the context's negotiated languages and renders it.
    ///
    /// Serialization of the envelope cannot fail; the struct has no
    /// non-serializable fields.
    #[must_use]
    pub fn render_error(&self, ctx: &CallContext, mut err: ServiceError) -> Response {
        err.ensure_message(&self.lookup, &languages(ctx));
        let body = serde_json::to_vec(&err).unwrap_or_else(|_| b"{}".to_vec());
        json_response(http::StatusCode::OK, body)
    }
}
