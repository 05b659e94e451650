//! # Weft
//!
//! Transport-agnostic middleware chaining. One set of composition laws,
//! four transport surfaces:
//!
//! - [`http`] – async client and server chains over `http` request and
//!   response types
//! - [`rpc`] – unary and streaming interceptor chains for both call sides
//! - [`storage`] – ten-operation middleware over a blocking driver surface,
//!   with bidirectional context propagation
//! - [`cache`] – command and pipeline wrapper chains plus a pooled client
//!
//! Every family obeys the same laws: absent entries are elided before
//! composition, an empty chain degenerates to the terminal (or identity),
//! a singleton is used unchanged, and N entries execute left-to-right as
//! registered with post-logic unwinding in reverse.
//!
//! Per-call state travels through [`core::CallContext`]; chains themselves
//! are immutable and shared across concurrent calls.
//!
//! ## Quick start
//!
//! ```rust
//! use weft::prelude::*;
//!
//! let ctx = CallContext::background();
//! let ctx = with_caller_name(&ctx, "frontend");
//! assert_eq!(caller_name(&ctx), "frontend");
//! ```

#![forbid(unsafe_code)]

pub use weft_core as core;

pub use weft_http as http;

pub use weft_rpc as rpc;

pub use weft_storage as storage;

pub use weft_cache as cache;

pub use weft_telemetry as telemetry;

/// Convenient imports for the common surface.
pub mod prelude {
    pub use weft_core::{
        caller_name, chain, languages, wrap, with_caller_name, with_languages, CallContext,
        Middleware, ServiceError, Terminal,
    };

    pub use weft_http::{
        with_client_middleware, with_server_middleware, ClientMiddleware, ServerMiddleware,
    };

    pub use weft_rpc::{
        chain_stream_client, chain_stream_server, chain_unary_client, chain_unary_server,
        Metadata,
    };

    pub use weft_storage::{chain_middlewares, Database, StorageMiddleware};

    pub use weft_cache::{chain_cmder_wrappers, chain_pipeliner_wrappers, Client, Pool};

    pub use weft_telemetry::CallMetrics;
}
