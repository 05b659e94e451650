//! Response error-message enrichment.

use crate::interceptor::UnaryServerInterceptor;
use crate::lang::languages_from_incoming;
use std::sync::Arc;
use weft_core::lang::with_languages;
use weft_core::MessageLookup;

/// Server interceptor that localizes the response-embedded error message.
///
/// Negotiates languages from incoming metadata, threads them through the
/// call context for inner stages, and after the handler returns fills an
/// absent error message through `lookup` (with the unknown-error sentinel
/// as final fallback). The error code is never altered, and transport
/// failures pass through untouched.
#[must_use]
pub fn unary_error_translator(lookup: MessageLookup) -> UnaryServerInterceptor {
    Arc::new(move |ctx, req, _info, handler| {
        let langs = languages_from_incoming(&ctx);
        let derived = with_languages(&ctx, langs.clone());

        let mut response = handler(derived, req)?;
        if let Some(err) = response.error.as_mut() {
            err.ensure_message(&lookup, &langs);
        }
        Ok(response)
    })
}
