//! Server-side (inbound) middleware chain.
//!
//! Middleware receives the request, the per-call [`CallContext`], and a
//! [`Next`] callback. Calling `next.run()` continues the chain; returning
//! without calling it short-circuits and produces the response directly.
//! Context flows by derivation: a middleware passes a derived context to
//! `next.run()` and every inner stage (and the handler) observes it.

use crate::types::{BoxFuture, Request, Response};
use std::sync::Arc;
use weft_core::CallContext;

/// The terminal request handler.
pub type HandlerFn = dyn Fn(CallContext, Request) -> BoxFuture<'static, Response> + Send + Sync;

/// A shared, boxed handler: the unit the chain builders compose around.
pub type BoxHandler = Arc<HandlerFn>;

/// A server middleware stage.
///
/// # Invariants
///
/// - Call `next.run()` at most once; `Next` is consumed by `run`.
/// - Pass a derived context to propagate values inward; never assume the
///   context received is the one the outermost stage started with.
pub trait ServerMiddleware: Send + Sync {
    /// Processes the request, continuing with `next` or short-circuiting.
    fn handle<'a>(
        &'a self,
        ctx: CallContext,
        req: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// Callback to invoke the rest of the chain.
///
/// Consumed by [`Next::run`], so it can be invoked at most once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn ServerMiddleware,
        next: Box<Next<'a>>,
    },
    Terminal(&'a HandlerFn),
}

impl<'a> Next<'a> {
    pub(crate) fn new(middleware: &'a dyn ServerMiddleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the handler directly.
    pub fn terminal(handler: &'a HandlerFn) -> Self {
        Self {
            inner: NextInner::Terminal(handler),
        }
    }

    /// Invokes the next stage in the chain.
    pub async fn run(self, ctx: CallContext, req: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.handle(ctx, req, *next).await,
            NextInner::Terminal(handler) => handler(ctx, req).await,
        }
    }
}

/// Wraps `handler` with the given middlewares; absent entries are elided.
///
/// Middlewares run left-to-right: the first entry sees the request first
/// and the response last. An empty (or all-absent) list returns `handler`
/// unchanged.
#[must_use]
pub fn with_server_middleware(
    handler: BoxHandler,
    middlewares: Vec<Option<Arc<dyn ServerMiddleware>>>,
) -> BoxHandler {
    let mut result = handler;
    for middleware in middlewares.into_iter().flatten().rev() {
        let inner = result;
        result = Arc::new(move |ctx: CallContext, req: Request| {
            let middleware = middleware.clone();
            let inner = inner.clone();
            Box::pin(async move {
                middleware
                    .handle(ctx, req, Next::terminal(inner.as_ref()))
                    .await
            }) as BoxFuture<'static, Response>
        });
    }
    result
}

/// Two server middlewares fused into one; `first` runs before `second`.
struct ChainedServerMiddleware {
    first: Arc<dyn ServerMiddleware>,
    second: Arc<dyn ServerMiddleware>,
}

impl ServerMiddleware for ChainedServerMiddleware {
    fn handle<'a>(
        &'a self,
        ctx: CallContext,
        req: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        self.first
            .handle(ctx, req, Next::new(self.second.as_ref(), next))
    }
}

/// Composes many optional server middlewares into one.
///
/// `None` entries are elided; an empty result composes to `None`, a single
/// survivor is returned unchanged, and N survivors execute left-to-right.
#[must_use]
pub fn chain_server_middlewares(
    middlewares: Vec<Option<Arc<dyn ServerMiddleware>>>,
) -> Option<Arc<dyn ServerMiddleware>> {
    let mut present: Vec<Arc<dyn ServerMiddleware>> =
        middlewares.into_iter().flatten().collect();
    let mut composed = present.pop()?;
    while let Some(previous) = present.pop() {
        composed = Arc::new(ChainedServerMiddleware {
            first: previous,
            second: composed,
        });
    }
    Some(composed)
}
