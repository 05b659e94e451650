//! Per-call unary server metrics.

use crate::interceptor::UnaryServerInterceptor;
use std::sync::Arc;
use std::time::Instant;
use weft_core::caller::caller_name;
use weft_telemetry::CallMetrics;

/// Returns the short method name: the segment after the last `/`.
fn api_name(full_method: &str) -> &str {
    full_method.rsplit('/').next().unwrap_or(full_method)
}

/// Server interceptor recording the `(caller, api, code)` triple and latency
/// into `sink` for every unary call.
///
/// `caller` falls back to `"unknown"` when nothing published one; a
/// successful call records code `"0"`, a failed one the error's code.
#[must_use]
pub fn instrument_unary(sink: Arc<dyn CallMetrics>) -> UnaryServerInterceptor {
    Arc::new(move |ctx, req, info, handler| {
        let started = Instant::now();
        let result = handler(ctx.clone(), req);

        let caller = match caller_name(&ctx) {
            "" => "unknown",
            name => name,
        };
        let code = match &result {
            Ok(_) => "0".to_string(),
            Err(e) => e.code().to_string(),
        };
        let api = api_name(&info.full_method);
        sink.record_call(caller, api, &code, started.elapsed());
        tracing::debug!(caller, api, code = %code, "unary call recorded");
        result
    })
}
