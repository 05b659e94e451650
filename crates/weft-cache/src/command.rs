//! Single-command wrapper algebra.

use crate::reply::Reply;
use std::fmt;
use std::sync::Arc;
use weft_core::CallContext;

/// One protocol command: a verb and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command verb, e.g. `GET`.
    pub verb: String,
    /// Command arguments.
    pub args: Vec<String>,
}

impl Command {
    /// Builds a command from a verb and arguments.
    #[must_use]
    pub fn new(verb: impl Into<String>, args: Vec<String>) -> Self {
        Self { verb: verb.into(), args }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Terminal single-command executor.
pub type Cmder = Arc<dyn Fn(&CallContext, &str, &[String]) -> Reply + Send + Sync>;

/// Wrapper around a [`Cmder`]: receives the next stage first.
pub type CmderWrapper =
    Arc<dyn Fn(&Cmder, &CallContext, &str, &[String]) -> Reply + Send + Sync>;

/// Layers `wrapper` around `next`; an absent wrapper leaves `next`
/// unchanged.
#[must_use]
pub fn wrap_cmder(wrapper: Option<CmderWrapper>, next: Cmder) -> Cmder {
    match wrapper {
        None => next,
        Some(w) => Arc::new(move |ctx, verb, args| w(&next, ctx, verb, args)),
    }
}

/// Composes optional wrappers into one.
///
/// Absent entries are elided; zero survivors yield the identity wrapper,
/// one is returned unchanged, N execute left-to-right as registered.
#[must_use]
pub fn chain_cmder_wrappers(wrappers: Vec<Option<CmderWrapper>>) -> CmderWrapper {
    let mut present: Vec<CmderWrapper> = wrappers.into_iter().flatten().collect();
    match present.len() {
        0 => Arc::new(|next: &Cmder, ctx: &CallContext, verb: &str, args: &[String]| {
            next(ctx, verb, args)
        }),
        1 => present.remove(0),
        _ => Arc::new(move |next: &Cmder, ctx: &CallContext, verb: &str, args: &[String]| {
            let mut n = next.clone();
            for w in present.iter().rev() {
                n = wrap_cmder(Some(w.clone()), n);
            }
            n(ctx, verb, args)
        }),
    }
}
