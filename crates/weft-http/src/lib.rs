//! # Weft HTTP
//!
//! Two structurally identical middleware chains over HTTP:
//!
//! - **Client-side**: wraps a [`Transport`] (round-tripper). Middleware may
//!   build a shallow copy of the outbound request to mutate headers, never
//!   the caller's original; one composed transport is shared across
//!   concurrent outbound calls.
//! - **Server-side**: wraps a handler in the `Next` style. Middleware runs
//!   `next` to continue or short-circuits by returning its own response.
//!
//! Both compose left-to-right = outer-to-inner: `with(handler, m1, m2, m3)`
//! runs m1's pre-logic, then m2's, then m3's, then the handler, then the
//! post-logic in reverse.
//!
//! Consumers built on the chains: caller-identity propagation
//! ([`caller`]), language negotiation ([`lang`]), call metrics
//! ([`metrics`]), and JSON error rendering ([`render`]).

#![forbid(unsafe_code)]

pub mod caller;
pub mod client;
pub mod error;
pub mod lang;
pub mod metrics;
pub mod render;
pub mod server;
pub mod types;

pub use caller::{ExtractCallerName, InjectCallerName, CALLER_NAME_HEADER};
pub use client::{chain_client_middlewares, with_client_middleware, ClientMiddleware, Transport};
pub use error::HttpError;
pub use lang::AcceptLanguage;
pub use metrics::instrument;
pub use render::JsonRenderer;
pub use server::{
    chain_server_middlewares, with_server_middleware, BoxHandler, Next, ServerMiddleware,
};
pub use types::{clone_with_headers, BoxFuture, Request, Response};

/// Result type alias using [`HttpError`].
pub type HttpResult<T> = Result<T, HttpError>;
