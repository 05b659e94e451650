//! # Weft Core
//!
//! Shared foundation for the Weft middleware library: the per-call
//! [`CallContext`], the generic chain algebra, and the cross-cutting value
//! types (caller identity, negotiated languages, service errors) that the
//! transport-specific crates build on.
//!
//! ## The chaining model
//!
//! Every Weft transport composes behavior the same way:
//!
//! ```text
//! call → m1(pre) → m2(pre) → ... → terminal → ... → m2(post) → m1(post)
//! ```
//!
//! Middleware registered left-to-right executes its pre-logic left-to-right
//! and its post-logic in reverse (standard nested-scope semantics). Absent
//! entries are elided before composition, the empty chain degenerates to the
//! terminal itself, and a singleton chain adds no wrapping overhead.
//!
//! Chains and middleware instances are immutable after construction and are
//! shared across concurrent calls; all per-call state travels through the
//! [`CallContext`], never through middleware fields.

#![forbid(unsafe_code)]

pub mod caller;
pub mod chain;
pub mod context;
pub mod error;
pub mod lang;

pub use caller::{caller_name, with_caller_name};
pub use chain::{chain, wrap, Middleware, Terminal};
pub use context::CallContext;
pub use error::{MessageLookup, ServiceError, UNKNOWN_ERROR_MESSAGE};
pub use lang::{
    from_accept_header, languages, parse_accept_language, with_languages, LangQPair,
    DEFAULT_LANGUAGE,
};
