//! Cache client: a transport seam plus the composed command and pipeline
//! chains.

use crate::command::{wrap_cmder, Cmder, CmderWrapper, Command};
use crate::pipeline::{wrap_pipeliner, Pipeliner, PipelinerWrapper};
use crate::reply::{CacheError, Reply};
use std::collections::VecDeque;
use std::sync::Arc;
use weft_core::CallContext;

/// The wire-facing seam. Implementations own one connection's protocol
/// state; `append` queues a command without reading, `fetch_reply` reads
/// the next buffered reply.
pub trait CacheTransport: Send + Sync {
    /// Executes one command and returns its reply.
    fn command(&self, verb: &str, args: &[String]) -> Reply;

    /// Queues a command without waiting for its reply.
    fn append(&self, command: &Command);

    /// Reads the next reply for a previously queued command.
    fn fetch_reply(&self) -> Reply;

    /// Releases the underlying connection.
    fn close(&self);
}

/// A cache client bound to one transport.
///
/// The command and pipeline chains are resolved once at construction;
/// per-call dispatch costs one virtual call per layer.
pub struct Client {
    transport: Arc<dyn CacheTransport>,
    cmder: Cmder,
    pipeliner: Pipeliner,
    pending: Vec<Command>,
    completed: VecDeque<Reply>,
}

impl Client {
    /// Builds a client around `transport`, layering the given wrappers
    /// over the transport's command and pipeline terminals.
    #[must_use]
    pub fn new(
        transport: Arc<dyn CacheTransport>,
        cmder_wrapper: Option<CmderWrapper>,
        pipeliner_wrapper: Option<PipelinerWrapper>,
    ) -> Self {
        let base_transport = transport.clone();
        let base_cmder: Cmder =
            Arc::new(move |_ctx, verb, args| base_transport.command(verb, args));

        let pipe_transport = transport.clone();
        let base_pipeliner: Pipeliner = Arc::new(move |_ctx, commands: &[Command]| {
            for command in commands {
                pipe_transport.append(command);
            }
            commands.iter().map(|_| pipe_transport.fetch_reply()).collect()
        });

        Self {
            transport,
            cmder: wrap_cmder(cmder_wrapper, base_cmder),
            pipeliner: wrap_pipeliner(pipeliner_wrapper, base_pipeliner),
            pending: Vec::new(),
            completed: VecDeque::new(),
        }
    }

    /// Executes one command through the composed chain.
    pub fn cmd(&self, ctx: &CallContext, verb: &str, args: &[String]) -> Reply {
        (self.cmder)(ctx, verb, args)
    }

    /// Queues a command for the next [`get_reply`](Self::get_reply) flush.
    pub fn append(&mut self, verb: &str, args: Vec<String>) {
        self.pending.push(Command::new(verb, args));
    }

    /// Returns the next reply for a queued command.
    ///
    /// Buffered replies from an earlier flush drain first. Otherwise the
    /// pending batch runs through the composed pipeline chain and its
    /// replies are buffered. With nothing pending and nothing buffered the
    /// reply is an [`CacheError::EmptyPipeline`] error, never a panic.
    pub fn get_reply(&mut self, ctx: &CallContext) -> Reply {
        if let Some(reply) = self.completed.pop_front() {
            return reply;
        }
        if self.pending.is_empty() {
            return Reply::Error(CacheError::EmptyPipeline);
        }

        let batch = std::mem::take(&mut self.pending);
        let replies = (self.pipeliner)(ctx, &batch);
        self.completed.extend(replies);
        self.completed.pop_front().unwrap_or(Reply::Error(CacheError::EmptyPipeline))
    }

    /// Number of commands queued but not yet flushed.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Closes the underlying transport.
    pub fn close(&self) {
        self.transport.close();
    }

    /// Releases the transport back to whoever pooled it.
    #[must_use]
    pub fn into_transport(self) -> Arc<dyn CacheTransport> {
        self.transport
    }
}
