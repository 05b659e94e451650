//! The generic chain algebra.
//!
//! Every Weft transport follows the same composition rule; this module is
//! the rule itself, stated once over two shapes:
//!
//! - a **terminal** `(context, args) -> result`, the innermost callable
//!   performing the real work, and
//! - a **middleware** `(context, next, args) -> result`, a behavior that
//!   may observe or replace the call before and after delegating to `next`,
//!   or short-circuit by not calling `next` at all.
//!
//! Composition laws:
//!
//! - [`wrap`] with `None` returns the terminal unchanged (identity law).
//! - [`chain`] of an empty (or all-absent) list is the identity middleware.
//! - [`chain`] of a single middleware is that middleware, unwrapped.
//! - `chain([m1, m2, ..., mN])` behaves exactly like
//!   `m1(ctx, wrap(m2, wrap(..., wrap(mN, terminal))), args)`: physical
//!   wrapping is right-to-left so logical execution is left-to-right.
//!
//! The algebra itself never fails; failures originate in the terminal or in
//! a middleware's own logic and propagate as ordinary results.
//!
//! The transport crates restate this algebra over their own concrete call
//! shapes (the storage middleware hand-specializes it per operation kind to
//! keep context-propagation direction statically visible); this generic form
//! is for behaviors whose call shape fits a single argument/result pair.

use crate::context::CallContext;
use std::sync::Arc;

/// The innermost callable of a chain.
pub type Terminal<A, R> = Arc<dyn Fn(&CallContext, A) -> R + Send + Sync>;

/// A behavior unit wrapping a [`Terminal`].
pub type Middleware<A, R> = Arc<dyn Fn(&CallContext, &Terminal<A, R>, A) -> R + Send + Sync>;

/// Wraps `next` with `middleware`, yielding a new terminal-shaped function.
///
/// An absent middleware returns `next` unchanged.
#[must_use]
pub fn wrap<A, R>(middleware: Option<Middleware<A, R>>, next: Terminal<A, R>) -> Terminal<A, R>
where
    A: 'static,
    R: 'static,
{
    match middleware {
        None => next,
        Some(m) => Arc::new(move |ctx, args| m(ctx, &next, args)),
    }
}

/// Composes a list of optional middlewares into a single middleware.
///
/// Absent entries are elided first. The composed middleware runs the first
/// present entry outermost; an empty or all-absent list composes to the
/// identity middleware, which simply invokes the terminal.
#[must_use]
pub fn chain<A, R>(middlewares: Vec<Option<Middleware<A, R>>>) -> Middleware<A, R>
where
    A: 'static,
    R: 'static,
{
    let mut present: Vec<Middleware<A, R>> = middlewares.into_iter().flatten().collect();
    match present.len() {
        0 => Arc::new(|ctx, next, args| next(ctx, args)),
        1 => present.remove(0),
        _ => Arc::new(move |ctx, next, args| {
            let mut inner: Terminal<A, R> = next.clone();
            for m in present.iter().skip(1).rev() {
                inner = wrap(Some(m.clone()), inner);
            }
            present[0](ctx, &inner, args)
        }),
    }
}
