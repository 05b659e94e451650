//! Batched-pipeline wrapper algebra.
//!
//! Structurally the same as the single-command family, over a batch of
//! commands producing one reply per command.

use crate::command::Command;
use crate::reply::Reply;
use std::sync::Arc;
use weft_core::CallContext;

/// Terminal pipeline executor: one reply per command, in order.
pub type Pipeliner = Arc<dyn Fn(&CallContext, &[Command]) -> Vec<Reply> + Send + Sync>;

/// Wrapper around a [`Pipeliner`]: receives the next stage first.
pub type PipelinerWrapper =
    Arc<dyn Fn(&Pipeliner, &CallContext, &[Command]) -> Vec<Reply> + Send + Sync>;

/// Layers `wrapper` around `next`; an absent wrapper leaves `next`
/// unchanged.
#[must_use]
pub fn wrap_pipeliner(wrapper: Option<PipelinerWrapper>, next: Pipeliner) -> Pipeliner {
    match wrapper {
        None => next,
        Some(w) => Arc::new(move |ctx, commands| w(&next, ctx, commands)),
    }
}

/// Composes optional wrappers into one.
///
/// Absent entries are elided; zero survivors yield the identity wrapper,
/// one is returned unchanged, N execute left-to-right as registered.
#[must_use]
pub fn chain_pipeliner_wrappers(wrappers: Vec<Option<PipelinerWrapper>>) -> PipelinerWrapper {
    let mut present: Vec<PipelinerWrapper> = wrappers.into_iter().flatten().collect();
    match present.len() {
        0 => Arc::new(|next: &Pipeliner, ctx: &CallContext, commands: &[Command]| {
            next(ctx, commands)
        }),
        1 => present.remove(0),
        _ => Arc::new(move |next: &Pipeliner, ctx: &CallContext, commands: &[Command]| {
            let mut n = next.clone();
            for w in present.iter().rev() {
                n = wrap_pipeliner(Some(w.clone()), n);
            }
            n(ctx, commands)
        }),
    }
}
