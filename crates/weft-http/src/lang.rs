//! `Accept-Language` negotiation middleware.

use crate::server::{Next, ServerMiddleware};
use crate::types::{BoxFuture, Request, Response};
use weft_core::lang::{from_accept_header, with_languages};
use weft_core::CallContext;

/// Server middleware that parses the `Accept-Language` header into the call
/// context's negotiated language list, sorted by descending weight.
///
/// A missing header leaves the context untouched; readers then fall back to
/// [`weft_core::lang::DEFAULT_LANGUAGE`].
pub struct AcceptLanguage;

impl ServerMiddleware for AcceptLanguage {
    fn handle<'a>(
        &'a self,
        ctx: CallContext,
        req: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let derived = match req
                .headers()
                .get(http::header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
            {
                Some(value) => with_languages(&ctx, from_accept_header(value)),
                None => ctx,
            };
            next.run(derived, req).await
        })
    }
}
