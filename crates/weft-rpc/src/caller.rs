//! Caller identity propagation over the `caller-name` metadata key.

use crate::interceptor::{
    StreamClientInterceptor, StreamServerInterceptor, UnaryClientInterceptor,
    UnaryServerInterceptor,
};
use crate::metadata::{incoming_metadata, merge_outgoing, Metadata};
use crate::stream::stream_with_context;
use std::sync::Arc;
use weft_core::caller::with_caller_name;
use weft_core::CallContext;

/// Metadata key carrying the calling service's name.
pub const METADATA_CALLER_NAME: &str = "caller-name";

fn caller_metadata(service_name: &str) -> Metadata {
    Metadata::new().with(METADATA_CALLER_NAME, service_name)
}

fn extracted_caller(ctx: &CallContext) -> CallContext {
    let name = incoming_metadata(ctx)
        .and_then(|md| md.get(METADATA_CALLER_NAME))
        .unwrap_or("");
    with_caller_name(ctx, name)
}

/// Client unary interceptor stamping this service's name on outbound
/// metadata. Merges with whatever metadata outer interceptors attached.
#[must_use]
pub fn inject_caller_name_unary(service_name: &str) -> UnaryClientInterceptor {
    let md = caller_metadata(service_name);
    Arc::new(move |ctx, method, req, invoker| {
        let derived = merge_outgoing(&ctx, &md);
        invoker(derived, method, req)
    })
}

/// Client stream interceptor stamping this service's name on outbound
/// metadata.
#[must_use]
pub fn inject_caller_name_stream(service_name: &str) -> StreamClientInterceptor {
    let md = caller_metadata(service_name);
    Arc::new(move |ctx, desc, streamer| {
        let derived = merge_outgoing(&ctx, &md);
        streamer(derived, desc)
    })
}

/// Server unary interceptor publishing the peer's `caller-name` metadata
/// into the call context. Absent metadata yields the empty-string sentinel.
#[must_use]
pub fn extract_caller_name_unary() -> UnaryServerInterceptor {
    Arc::new(|ctx, req, _info, handler| handler(extracted_caller(&ctx), req))
}

/// Server stream interceptor publishing the peer's `caller-name` metadata
/// into the stream's context.
#[must_use]
pub fn extract_caller_name_stream() -> StreamServerInterceptor {
    Arc::new(|stream, _info, handler| {
        let derived = extracted_caller(&stream.context());
        handler(stream_with_context(stream, derived))
    })
}
