//! Per-call HTTP metrics.

use crate::server::BoxHandler;
use crate::types::Request;
use std::sync::Arc;
use std::time::Instant;
use weft_core::caller::caller_name;
use weft_core::CallContext;
use weft_telemetry::CallMetrics;

/// Wraps `handler` so every call records the `(caller, api, code)` triple
/// and latency into `sink`.
///
/// `caller` comes from the call context and falls back to `"unknown"` when
/// nothing published one; `code` is the numeric response status.
#[must_use]
pub fn instrument(api: &str, sink: Arc<dyn CallMetrics>, handler: BoxHandler) -> BoxHandler {
    let api = api.to_string();
    Arc::new(move |ctx: CallContext, req: Request| {
        let api = api.clone();
        let sink = sink.clone();
        let handler = handler.clone();
        Box::pin(async move {
            let started = Instant::now();
            let response = handler(ctx.clone(), req).await;

            let caller = match caller_name(&ctx) {
                "" => "unknown",
                name => name,
            };
            let status = response.status();
            sink.record_call(caller, &api, status.as_str(), started.elapsed());
            tracing::debug!(caller, api = %api, status = %status, "request recorded");
            response
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use weft_core::caller::with_caller_name;
    use weft_telemetry::RecordingSink;

    fn handler(status: StatusCode) -> BoxHandler {
        Arc::new(move |_ctx, _req| {
            Box::pin(async move {
                http::Response::builder()
                    .status(status)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        })
    }

    fn request() -> Request {
        http::Request::builder()
            .uri("/v1/users")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn records_caller_api_and_status() {
        let sink = Arc::new(RecordingSink::new());
        let wrapped = instrument("get_user", sink.clone(), handler(StatusCode::NOT_FOUND));

        let ctx = with_caller_name(&CallContext::background(), "frontend");
        wrapped(ctx, request()).await;

        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].caller, "frontend");
        assert_eq!(calls[0].api, "get_user");
        assert_eq!(calls[0].code, "404");
    }

    #[tokio::test]
    async fn absent_caller_becomes_unknown() {
        let sink = Arc::new(RecordingSink::new());
        let wrapped = instrument("get_user", sink.clone(), handler(StatusCode::OK));

        wrapped(CallContext::background(), request()).await;

        assert_eq!(sink.calls()[0].caller, "unknown");
    }
}
