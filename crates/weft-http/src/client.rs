//! Client-side (outbound) middleware chain.
//!
//! The terminal is a [`Transport`]: the object that actually performs the
//! round trip. Middleware wraps a transport and receives the next stage as
//! `&dyn Transport`, so it can inspect the request and the response, or
//! short-circuit by returning without delegating.
//!
//! Composition contract (shared by every Weft chain family): absent entries
//! are elided, zero middlewares return the transport unchanged, one
//! middleware adds a single wrapper, and N middlewares execute
//! left-to-right as registered.

use crate::types::{BoxFuture, Request, Response};
use crate::HttpResult;
use std::sync::Arc;
use weft_core::CallContext;

/// The terminal round-tripper: performs one HTTP exchange.
///
/// Implementations must be safe to share across concurrent calls; any
/// per-call state belongs in the [`CallContext`] or the request itself.
pub trait Transport: Send + Sync {
    /// Performs the exchange.
    fn round_trip<'a>(
        &'a self,
        ctx: &'a CallContext,
        req: Request,
    ) -> BoxFuture<'a, HttpResult<Response>>;
}

/// A client middleware: observes/alters the outbound call around `next`.
///
/// The inbound `req` is conceptually immutable: to change it, build a
/// shallow copy with [`crate::types::clone_with_headers`] and mutate that.
pub trait ClientMiddleware: Send + Sync {
    /// Processes the request, usually delegating to `next`.
    fn handle<'a>(
        &'a self,
        ctx: &'a CallContext,
        req: Request,
        next: &'a dyn Transport,
    ) -> BoxFuture<'a, HttpResult<Response>>;
}

/// A transport wrapped by one middleware layer.
struct WrappedTransport {
    middleware: Arc<dyn ClientMiddleware>,
    next: Arc<dyn Transport>,
}

impl Transport for WrappedTransport {
    fn round_trip<'a>(
        &'a self,
        ctx: &'a CallContext,
        req: Request,
    ) -> BoxFuture<'a, HttpResult<Response>> {
        self.middleware.handle(ctx, req, self.next.as_ref())
    }
}

/// Wraps `transport` with the given middlewares; absent entries are elided.
///
/// Middlewares run left-to-right: the first entry sees the request first
/// and the response last. An empty (or all-absent) list returns `transport`
/// unchanged.
#[must_use]
pub fn with_client_middleware(
    transport: Arc<dyn Transport>,
    middlewares: Vec<Option<Arc<dyn ClientMiddleware>>>,
) -> Arc<dyn Transport> {
    let mut result = transport;
    for middleware in middlewares.into_iter().flatten().rev() {
        result = Arc::new(WrappedTransport {
            middleware,
            next: result,
        });
    }
    result
}

/// Two middlewares fused into one; `first` runs before `second`.
struct ChainedClientMiddleware {
    first: Arc<dyn ClientMiddleware>,
    second: Arc<dyn ClientMiddleware>,
}

/// Borrowed continuation: runs a middleware in front of a transport.
struct SecondHop<'n> {
    middleware: &'n dyn ClientMiddleware,
    next: &'n dyn Transport,
}

impl Transport for SecondHop<'_> {
    fn round_trip<'a>(
        &'a self,
        ctx: &'a CallContext,
        req: Request,
    ) -> BoxFuture<'a, HttpResult<Response>> {
        self.middleware.handle(ctx, req, self.next)
    }
}

impl ClientMiddleware for ChainedClientMiddleware {
    fn handle<'a>(
        &'a self,
        ctx: &'a CallContext,
        req: Request,
        next: &'a dyn Transport,
    ) -> BoxFuture<'a, HttpResult<Response>> {
        Box::pin(async move {
            let tail = SecondHop {
                middleware: self.second.as_ref(),
                next,
            };
            self.first.handle(ctx, req, &tail).await
        })
    }
}

/// Composes many optional client middlewares into one.
///
/// `None` entries are elided; an empty result composes to `None`, a single
/// survivor is returned unchanged, and N survivors execute left-to-right.
#[must_use]
pub fn chain_client_middlewares(
    middlewares: Vec<Option<Arc<dyn ClientMiddleware>>>,
) -> Option<Arc<dyn ClientMiddleware>> {
    let mut present: Vec<Arc<dyn ClientMiddleware>> =
        middlewares.into_iter().flatten().collect();
    let mut composed = present.pop()?;
    while let Some(previous) = present.pop() {
        composed = Arc::new(ChainedClientMiddleware {
            first: previous,
            second: composed,
        });
    }
    Some(composed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;
    use std::sync::Mutex;

    struct OkTransport {
        trace: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for OkTransport {
        fn round_trip<'a>(
            &'a self,
            _ctx: &'a CallContext,
            req: Request,
        ) -> BoxFuture<'a, HttpResult<Response>> {
            Box::pin(async move {
                self.trace.lock().unwrap().push("terminal".to_string());
                let echoed = req
                    .headers()
                    .get("x-trace")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Ok(http::Response::builder()
                    .header("x-trace", echoed)
                    .body(Full::new(Bytes::new()))
                    .unwrap())
            })
        }
    }

    struct TraceMiddleware {
        name: &'static str,
        trace: Arc<Mutex<Vec<String>>>,
    }

    impl ClientMiddleware for TraceMiddleware {
        fn handle<'a>(
            &'a self,
            ctx: &'a CallContext,
            req: Request,
            next: &'a dyn Transport,
        ) -> BoxFuture<'a, HttpResult<Response>> {
            Box::pin(async move {
                self.trace.lock().unwrap().push(format!("enter-{}", self.name));
                let resp = next.round_trip(ctx, req).await;
                self.trace.lock().unwrap().push(format!("exit-{}", self.name));
                resp
            })
        }
    }

    fn request() -> Request {
        http::Request::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_chain_is_passthrough() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let terminal: Arc<dyn Transport> = Arc::new(OkTransport { trace: trace.clone() });
        let composed = with_client_middleware(terminal.clone(), vec![None, None]);
        assert!(Arc::ptr_eq(&composed, &terminal));

        let ctx = CallContext::background();
        composed.round_trip(&ctx, request()).await.unwrap();
        assert_eq!(*trace.lock().unwrap(), vec!["terminal"]);
    }

    #[tokio::test]
    async fn three_middlewares_nest() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let terminal: Arc<dyn Transport> = Arc::new(OkTransport { trace: trace.clone() });
        let composed = with_client_middleware(
            terminal,
            vec![
                Some(Arc::new(TraceMiddleware { name: "m1", trace: trace.clone() })),
                None,
                Some(Arc::new(TraceMiddleware { name: "m2", trace: trace.clone() })),
                Some(Arc::new(TraceMiddleware { name: "m3", trace: trace.clone() })),
            ],
        );

        let ctx = CallContext::background();
        composed.round_trip(&ctx, request()).await.unwrap();
        assert_eq!(
            *trace.lock().unwrap(),
            vec![
                "enter-m1", "enter-m2", "enter-m3", "terminal", "exit-m3", "exit-m2", "exit-m1"
            ]
        );
    }

    #[tokio::test]
    async fn chained_middleware_matches_wrapping() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let terminal: Arc<dyn Transport> = Arc::new(OkTransport { trace: trace.clone() });

        let fused = chain_client_middlewares(vec![
            Some(Arc::new(TraceMiddleware { name: "a", trace: trace.clone() })),
            Some(Arc::new(TraceMiddleware { name: "b", trace: trace.clone() })),
        ])
        .expect("two middlewares compose to one");
        let composed = with_client_middleware(terminal, vec![Some(fused)]);

        let ctx = CallContext::background();
        composed.round_trip(&ctx, request()).await.unwrap();
        assert_eq!(
            *trace.lock().unwrap(),
            vec!["enter-a", "enter-b", "terminal", "exit-b", "exit-a"]
        );
    }

    #[test]
    fn chain_of_none_is_none() {
        assert!(chain_client_middlewares(vec![None, None]).is_none());
    }

    #[test]
    fn chain_of_one_is_unchanged() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let only: Arc<dyn ClientMiddleware> =
            Arc::new(TraceMiddleware { name: "only", trace });
        let composed = chain_client_middlewares(vec![None, Some(only.clone())]);
        assert!(Arc::ptr_eq(&composed.expect("one survivor"), &only));
    }
}
