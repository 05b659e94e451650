//! Caller identity propagation over the `Caller-Name` header.

use crate::client::{ClientMiddleware, Transport};
use crate::server::{Next, ServerMiddleware};
use crate::types::{clone_with_headers, BoxFuture, Request, Response};
use crate::{HttpError, HttpResult};
use http::header::{HeaderName, HeaderValue};
use weft_core::caller::with_caller_name;
use weft_core::CallContext;

/// Header carrying the calling service's name.
pub const CALLER_NAME_HEADER: HeaderName = HeaderName::from_static("caller-name");

/// Client middleware that stamps this service's name on outbound requests.
///
/// The header value is validated once at construction; an unrepresentable
/// service name is a configuration error, not a per-call failure.
pub struct InjectCallerName {
    value: HeaderValue,
}

impl InjectCallerName {
    /// Creates the middleware for the given service name.
    pub fn new(service_name: &str) -> HttpResult<Self> {
        let value = HeaderValue::from_str(service_name)
            .map_err(|e| HttpError::Config(format!("invalid caller name: {e}")))?;
        Ok(Self { value })
    }
}

impl ClientMiddleware for InjectCallerName {
    fn handle<'a>(
        &'a self,
        ctx: &'a CallContext,
        req: Request,
        next: &'a dyn Transport,
    ) -> BoxFuture<'a, HttpResult<Response>> {
        Box::pin(async move {
            let mut stamped = clone_with_headers(&req);
            stamped
                .headers_mut()
                .insert(CALLER_NAME_HEADER, self.value.clone());
            next.round_trip(ctx, stamped).await
        })
    }
}

/// Server middleware that publishes the inbound `Caller-Name` header into
/// the call context.
///
/// A missing or non-UTF-8 header yields the empty-string sentinel.
pub struct ExtractCallerName;

impl ServerMiddleware for ExtractCallerName {
    fn handle<'a>(
        &'a self,
        ctx: CallContext,
        req: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let name = req
                .headers()
                .get(CALLER_NAME_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            let derived = with_caller_name(&ctx, name);
            next.run(derived, req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{with_server_middleware, BoxHandler};
    use bytes::Bytes;
    use http_body_util::Full;
    use std::sync::{Arc, Mutex};
    use weft_core::caller::caller_name;

    struct CapturingTransport {
        seen: Arc<Mutex<Option<String>>>,
    }

    impl Transport for CapturingTransport {
        fn round_trip<'a>(
            &'a self,
            _ctx: &'a CallContext,
            req: Request,
        ) -> BoxFuture<'a, HttpResult<Response>> {
            Box::pin(async move {
                *self.seen.lock().unwrap() = req
                    .headers()
                    .get(CALLER_NAME_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);
                Ok(http::Response::new(Full::new(Bytes::new())))
            })
        }
    }

    #[tokio::test]
    async fn inject_stamps_header_on_a_copy() {
        let seen = Arc::new(Mutex::new(None));
        let transport = CapturingTransport { seen: seen.clone() };
        let middleware = InjectCallerName::new("billing").unwrap();

        let original: Request = http::Request::builder()
            .uri("/v1/charge")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let ctx = CallContext::background();
        middleware
            .handle(&ctx, clone_with_headers(&original), &transport)
            .await
            .unwrap();

        assert_eq!(seen.lock().unwrap().as_deref(), Some("billing"));
        assert!(!original.headers().contains_key(CALLER_NAME_HEADER));
    }

    #[test]
    fn invalid_caller_name_is_a_config_error() {
        assert!(matches!(
            InjectCallerName::new("bad\nname"),
            Err(HttpError::Config(_))
        ));
    }

    #[tokio::test]
    async fn extract_publishes_caller_into_context() {
        let observed = Arc::new(Mutex::new(String::new()));
        let observed_in_handler = observed.clone();
        let handler: BoxHandler = Arc::new(move |ctx: CallContext, _req| {
            let observed = observed_in_handler.clone();
            Box::pin(async move {
                *observed.lock().unwrap() = caller_name(&ctx).to_string();
                http::Response::new(Full::new(Bytes::new()))
            })
        });
        let wrapped = with_server_middleware(handler, vec![Some(Arc::new(ExtractCallerName))]);

        let req: Request = http::Request::builder()
            .uri("/v1/charge")
            .header(CALLER_NAME_HEADER, "frontend")
            .body(Full::new(Bytes::new()))
            .unwrap();
        wrapped(CallContext::background(), req).await;

        assert_eq!(*observed.lock().unwrap(), "frontend");
    }
}
