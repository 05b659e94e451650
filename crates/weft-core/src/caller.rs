//! Caller identity as a context entry.
//!
//! Transport-specific middleware (the `Caller-Name` HTTP header, the
//! `caller-name` RPC metadata key) publishes the upstream service's name
//! here; consumers such as chain instrumentation read it back.
//!
//! Recognized entry: [`CallerName`], set once at the edge of a call, valid
//! for the lifetime of the call.

use crate::context::CallContext;

/// Context entry holding the name of the calling service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerName(pub String);

/// Derives a context carrying the caller's name.
#[must_use]
pub fn with_caller_name(ctx: &CallContext, name: impl Into<String>) -> CallContext {
    ctx.with_value(CallerName(name.into()))
}

/// Returns the caller name, or the empty string when none was published.
///
/// Absence is not an error; `""` is the sentinel.
#[must_use]
pub fn caller_name(ctx: &CallContext) -> &str {
    ctx.value::<CallerName>().map_or("", |c| c.0.as_str())
}
