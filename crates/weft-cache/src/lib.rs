//! # Weft Cache
//!
//! Middleware for a cache protocol with two execution shapes: single
//! commands and batched pipelines. Each shape has its own terminal type
//! ([`Cmder`], [`Pipeliner`]) and wrapper type ([`CmderWrapper`],
//! [`PipelinerWrapper`]); a wrapper receives the next stage as its first
//! argument and decides whether, and with what, to invoke it.
//!
//! Composition follows the Weft laws with one cache-specific twist: a
//! chain of zero wrappers composes to the identity wrapper rather than to
//! `None`, because a [`Client`] always holds a resolved chain.
//!
//! [`Pool`] stamps pre-composed chains onto every checked-out client;
//! [`LazyPool`] defers pool construction to first use.

#![forbid(unsafe_code)]

pub mod client;
pub mod command;
pub mod pipeline;
pub mod pool;
pub mod reply;

pub use client::{CacheTransport, Client};
pub use command::{chain_cmder_wrappers, wrap_cmder, Cmder, CmderWrapper, Command};
pub use pipeline::{chain_pipeliner_wrappers, wrap_pipeliner, Pipeliner, PipelinerWrapper};
pub use pool::{LazyPool, Pool, TransportPool};
pub use reply::{CacheError, Reply};

/// Result type alias using [`CacheError`].
pub type CacheResult<T> = Result<T, CacheError>;
