//! Language negotiation.
//!
//! Parses `Accept-Language` style values into weighted tags, orders them by
//! preference, and carries the negotiated list through the call context.
//!
//! Recognized entry: [`Languages`], the client's preferred language tags in
//! descending preference order, set by the HTTP or RPC negotiation
//! middleware and read by error-message enrichment.

use crate::context::CallContext;

/// The fallback language appended when negotiation yields nothing.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// A language tag with its quality weight.
#[derive(Debug, Clone, PartialEq)]
pub struct LangQPair {
    /// The language tag, e.g. `en-US`.
    pub lang: String,
    /// Quality weight in `[0, 1]`; 1.0 when unspecified or unparsable.
    pub q: f64,
}

/// Context entry holding the negotiated language list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages(pub Vec<String>);

/// Parses a comma-separated `tag[;q=weight]` list.
///
/// Entries with a missing or unparsable weight default to 1.0. Empty
/// segments are skipped. Input order is preserved.
#[must_use]
pub fn parse_accept_language(value: &str) -> Vec<LangQPair> {
    let mut results = Vec::new();
    for item in value.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let mut parts = item.splitn(2, ';');
        let lang = match parts.next() {
            Some(l) => l.to_string(),
            None => continue,
        };
        // NaN parses as a float but cannot be ordered; treat it as
        // unparsable so the sort in `from_accept_header` stays total.
        let q = parts
            .next()
            .and_then(|param| param.split('=').nth(1))
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|q| !q.is_nan())
            .unwrap_or(1.0);
        results.push(LangQPair { lang, q });
    }
    results
}

/// Parses an `Accept-Language` header value into tags sorted by descending
/// weight. The sort is stable: equal weights keep their original relative
/// order.
#[must_use]
pub fn from_accept_header(value: &str) -> Vec<String> {
    let mut pairs = parse_accept_language(value);
    pairs.sort_by(|a, b| b.q.partial_cmp(&a.q).unwrap_or(std::cmp::Ordering::Equal));
    pairs.into_iter().map(|p| p.lang).collect()
}

/// Derives a context carrying the negotiated languages.
#[must_use]
pub fn with_languages(ctx: &CallContext, languages: Vec<String>) -> CallContext {
    ctx.with_value(Languages(languages))
}

/// Returns the negotiated languages, or `[DEFAULT_LANGUAGE]` when none were
/// set. An entry holding an empty list counts as unset.
#[must_use]
pub fn languages(ctx: &CallContext) -> Vec<String> {
    match ctx.value::<Languages>() {
        Some(l) if !l.0.is_empty() => l.0.clone(),
        _ => vec![DEFAULT_LANGUAGE.to_string()],
    }
}
