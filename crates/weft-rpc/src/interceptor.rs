//! Interceptor types and the four chain builders.
//!
//! Server-side interceptors wrap a handler; client-side interceptors wrap
//! the invoker (unary) or streamer (streaming). All four families follow
//! the shared composition laws: absent entries are elided, an empty list
//! composes to `None` (install nothing), a single survivor is returned
//! unchanged, and N survivors execute left-to-right as registered.
//!
//! The composed interceptor rebuilds its inner chain per call by folding
//! the tail around the terminal; the `Arc` terminals make each link a
//! cheap handle clone.

use crate::stream::{ClientStream, ServerStream};
use crate::RpcResult;
use bytes::Bytes;
use std::sync::Arc;
use weft_core::{CallContext, ServiceError};

/// A unary request message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryRequest {
    /// Encoded request payload.
    pub message: Bytes,
}

/// A unary response: payload plus an optional application-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryResponse {
    /// Encoded response payload.
    pub message: Bytes,
    /// Application error carried inside a successful transport exchange.
    pub error: Option<ServiceError>,
}

/// Static description of the unary method being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryServerInfo {
    /// Full method name, e.g. `/user.UserService/GetUser`.
    pub full_method: String,
}

/// Static description of the stream method being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamServerInfo {
    /// Full method name.
    pub full_method: String,
    /// True when the client sends a message stream.
    pub is_client_stream: bool,
    /// True when the server sends a message stream.
    pub is_server_stream: bool,
}

/// Static description of a stream the client opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDesc {
    /// Full method name.
    pub full_method: String,
    /// True when the client sends a message stream.
    pub client_streams: bool,
    /// True when the server sends a message stream.
    pub server_streams: bool,
}

/// Terminal unary handler on the server.
pub type UnaryHandler =
    Arc<dyn Fn(CallContext, UnaryRequest) -> RpcResult<UnaryResponse> + Send + Sync>;

/// Server-side unary interceptor.
pub type UnaryServerInterceptor = Arc<
    dyn Fn(CallContext, UnaryRequest, UnaryServerInfo, UnaryHandler) -> RpcResult<UnaryResponse>
        + Send
        + Sync,
>;

/// Terminal stream handler on the server. The call context travels on the
/// stream itself.
pub type StreamHandler = Arc<dyn Fn(Box<dyn ServerStream>) -> RpcResult<()> + Send + Sync>;

/// Server-side stream interceptor.
pub type StreamServerInterceptor =
    Arc<dyn Fn(Box<dyn ServerStream>, StreamServerInfo, StreamHandler) -> RpcResult<()> + Send + Sync>;

/// Terminal unary invoker on the client.
pub type UnaryInvoker =
    Arc<dyn Fn(CallContext, &str, UnaryRequest) -> RpcResult<UnaryResponse> + Send + Sync>;

/// Client-side unary interceptor.
pub type UnaryClientInterceptor = Arc<
    dyn Fn(CallContext, &str, UnaryRequest, UnaryInvoker) -> RpcResult<UnaryResponse> + Send + Sync,
>;

/// Terminal streamer on the client: opens a new stream.
pub type Streamer =
    Arc<dyn Fn(CallContext, StreamDesc) -> RpcResult<Box<dyn ClientStream>> + Send + Sync>;

/// Client-side stream interceptor.
pub type StreamClientInterceptor = Arc<
    dyn Fn(CallContext, StreamDesc, Streamer) -> RpcResult<Box<dyn ClientStream>> + Send + Sync,
>;

/// Composes unary server interceptors; `None` entries are elided.
#[must_use]
pub fn chain_unary_server(
    interceptors: Vec<Option<UnaryServerInterceptor>>,
) -> Option<UnaryServerInterceptor> {
    let mut present: Vec<UnaryServerInterceptor> =
        interceptors.into_iter().flatten().collect();
    if present.len() <= 1 {
        return present.pop();
    }
    Some(Arc::new(
        move |ctx: CallContext, req: UnaryRequest, info: UnaryServerInfo, handler: UnaryHandler| {
            let mut next = handler;
            for interceptor in present.iter().skip(1).rev() {
                let interceptor = interceptor.clone();
                let info = info.clone();
                let inner = next;
                next = Arc::new(move |ctx: CallContext, req: UnaryRequest| {
                    interceptor(ctx, req, info.clone(), inner.clone())
                });
            }
            present[0](ctx, req, info, next)
        },
    ))
}

/// Composes stream server interceptors; `None` entries are elided.
#[must_use]
pub fn chain_stream_server(
    interceptors: Vec<Option<StreamServerInterceptor>>,
) -> Option<StreamServerInterceptor> {
    let mut present: Vec<StreamServerInterceptor> =
        interceptors.into_iter().flatten().collect();
    if present.len() <= 1 {
        return present.pop();
    }
    Some(Arc::new(
        move |stream: Box<dyn ServerStream>, info: StreamServerInfo, handler: StreamHandler| {
            let mut next = handler;
            for interceptor in present.iter().skip(1).rev() {
                let interceptor = interceptor.clone();
                let info = info.clone();
                let inner = next;
                next = Arc::new(move |stream: Box<dyn ServerStream>| {
                    interceptor(stream, info.clone(), inner.clone())
                });
            }
            present[0](stream, info, next)
        },
    ))
}

/// Composes unary client interceptors; `None` entries are elided.
#[must_use]
pub fn chain_unary_client(
    interceptors: Vec<Option<UnaryClientInterceptor>>,
) -> Option<UnaryClientInterceptor> {
    let mut present: Vec<UnaryClientInterceptor> =
        interceptors.into_iter().flatten().collect();
    if present.len() <= 1 {
        return present.pop();
    }
    Some(Arc::new(
        move |ctx: CallContext, method: &str, req: UnaryRequest, invoker: UnaryInvoker| {
            let mut next = invoker;
            for interceptor in present.iter().skip(1).rev() {
                let interceptor = interceptor.clone();
                let inner = next;
                next = Arc::new(move |ctx: CallContext, method: &str, req: UnaryRequest| {
                    interceptor(ctx, method, req, inner.clone())
                });
            }
            present[0](ctx, method, req, next)
        },
    ))
}

/// Composes stream client interceptors; `None` entries are elided.
#[must_use]
pub fn chain_stream_client(
    interceptors: Vec<Option<StreamClientInterceptor>>,
) -> Option<StreamClientInterceptor> {
    let mut present: Vec<StreamClientInterceptor> =
        interceptors.into_iter().flatten().collect();
    if present.len() <= 1 {
        return present.pop();
    }
    Some(Arc::new(
        move |ctx: CallContext, desc: StreamDesc, streamer: Streamer| {
            let mut next = streamer;
            for interceptor in present.iter().skip(1).rev() {
                let interceptor = interceptor.clone();
                let inner = next;
                next = Arc::new(move |ctx: CallContext, desc: StreamDesc| {
                    interceptor(ctx, desc, inner.clone())
                });
            }
            present[0](ctx, desc, next)
        },
    ))
}
