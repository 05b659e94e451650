//! Server and client stream surfaces, and stream context substitution.

use crate::RpcResult;
use bytes::Bytes;
use weft_core::CallContext;

/// A server-side stream: the handler's view of a streaming call.
///
/// The call context lives on the stream, not alongside it, so interceptors
/// that derive a new context must hand the handler a stream that reports it.
pub trait ServerStream: Send {
    /// The call context this stream carries.
    fn context(&self) -> CallContext;

    /// Replaces the carried context in place, returning `true` on success.
    ///
    /// Plain transport streams return `false` (their context is fixed at
    /// creation); [`stream_with_context`] then wraps instead. Wrapper
    /// streams accept the replacement so repeated injection never deepens
    /// the wrapping.
    fn replace_context(&mut self, ctx: &CallContext) -> bool {
        let _ = ctx;
        false
    }

    /// Sends one message to the peer.
    fn send(&mut self, message: Bytes) -> RpcResult<()>;

    /// Receives the next message; `None` means the peer finished sending.
    fn recv(&mut self) -> RpcResult<Option<Bytes>>;
}

/// A client-side stream handle returned by a streamer.
pub trait ClientStream: Send {
    /// Sends one message to the server.
    fn send(&mut self, message: Bytes) -> RpcResult<()>;

    /// Receives the next message; `None` means the server finished.
    fn recv(&mut self) -> RpcResult<Option<Bytes>>;

    /// Signals that no further messages will be sent.
    fn close_send(&mut self) -> RpcResult<()>;
}

/// Wrapper substituting the context of an underlying server stream.
struct ContextStream {
    inner: Box<dyn ServerStream>,
    ctx: CallContext,
}

impl ServerStream for ContextStream {
    fn context(&self) -> CallContext {
        self.ctx.clone()
    }

    fn replace_context(&mut self, ctx: &CallContext) -> bool {
        self.ctx = ctx.clone();
        true
    }

    fn send(&mut self, message: Bytes) -> RpcResult<()> {
        self.inner.send(message)
    }

    fn recv(&mut self) -> RpcResult<Option<Bytes>> {
        self.inner.recv()
    }
}

/// Returns a stream reporting `ctx` as its call context.
///
/// If `stream` is already a context-substituting wrapper its stored context
/// is replaced; otherwise one wrapper is added. Sequential injections
/// therefore never nest: the wrapping depth stays at most one above the
/// transport stream, and the newest context always wins.
#[must_use]
pub fn stream_with_context(
    mut stream: Box<dyn ServerStream>,
    ctx: CallContext,
) -> Box<dyn ServerStream> {
    if stream.replace_context(&ctx) {
        return stream;
    }
    Box::new(ContextStream { inner: stream, ctx })
}
