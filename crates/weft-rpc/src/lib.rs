//! # Weft RPC
//!
//! Interceptor chains for unary and streaming RPC, on both the client and
//! server side. Interceptors are synchronous `Arc<dyn Fn>` closures: the
//! scheduling model belongs to the transport integration, not to this
//! crate, and a closure-based chain composes the same way regardless of
//! how calls are dispatched.
//!
//! All four chain builders ([`chain_unary_server`], [`chain_stream_server`],
//! [`chain_unary_client`], [`chain_stream_client`]) share the composition
//! laws of the other Weft transports: absent entries are elided, zero
//! survivors compose to `None`, one is returned unchanged, and N execute
//! left-to-right as registered.
//!
//! Streaming calls carry their context on the stream itself;
//! [`stream_with_context`] substitutes it without nesting wrappers.

#![forbid(unsafe_code)]

pub mod caller;
pub mod error;
pub mod interceptor;
pub mod lang;
pub mod metadata;
pub mod metrics;
pub mod stream;
pub mod translate;

pub use caller::{
    extract_caller_name_stream, extract_caller_name_unary, inject_caller_name_stream,
    inject_caller_name_unary, METADATA_CALLER_NAME,
};
pub use error::RpcError;
pub use interceptor::{
    chain_stream_client, chain_stream_server, chain_unary_client, chain_unary_server, StreamDesc,
    StreamClientInterceptor, StreamHandler, StreamServerInfo, StreamServerInterceptor, Streamer,
    UnaryClientInterceptor, UnaryHandler, UnaryInvoker, UnaryRequest, UnaryResponse,
    UnaryServerInfo, UnaryServerInterceptor,
};
pub use lang::{languages_from_incoming, set_outgoing_languages, METADATA_LANGUAGE};
pub use metadata::{
    incoming_metadata, merge_outgoing, outgoing_metadata, with_incoming_metadata,
    with_outgoing_metadata, IncomingMetadata, Metadata, OutgoingMetadata,
};
pub use metrics::instrument_unary;
pub use stream::{stream_with_context, ClientStream, ServerStream};
pub use translate::unary_error_translator;

/// Result type alias using [`RpcError`].
pub type RpcResult<T> = Result<T, RpcError>;
