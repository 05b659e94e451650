//! End-to-end streaming call through both interceptor chains.
//!
//! The streamer plays the wire: it moves the client's outgoing metadata
//! into the server stream's incoming metadata and dispatches the composed
//! server chain before handing a client stream back, the way a transport
//! integration would.

use bytes::Bytes;
use std::sync::{Arc, Mutex};
use weft_core::caller::caller_name;
use weft_core::CallContext;
use weft_rpc::{
    chain_stream_client, chain_stream_server, extract_caller_name_stream,
    inject_caller_name_stream, outgoing_metadata, with_incoming_metadata, ClientStream,
    RpcResult, ServerStream, StreamDesc, StreamHandler, StreamServerInfo, Streamer,
};

struct WireServerStream {
    ctx: CallContext,
}

impl ServerStream for WireServerStream {
    fn context(&self) -> CallContext {
        self.ctx.clone()
    }

    fn send(&mut self, _message: Bytes) -> RpcResult<()> {
        Ok(())
    }

    fn recv(&mut self) -> RpcResult<Option<Bytes>> {
        Ok(None)
    }
}

struct WireClientStream;

impl ClientStream for WireClientStream {
    fn send(&mut self, _message: Bytes) -> RpcResult<()> {
        Ok(())
    }

    fn recv(&mut self) -> RpcResult<Option<Bytes>> {
        Ok(None)
    }

    fn close_send(&mut self) -> RpcResult<()> {
        Ok(())
    }
}

#[test]
fn caller_name_crosses_the_wire_on_streams() {
    let observed_caller = Arc::new(Mutex::new(String::new()));

    let server_chain = chain_stream_server(vec![None, Some(extract_caller_name_stream())])
        .expect("one interceptor");

    let observed_in_handler = observed_caller.clone();
    let handler: StreamHandler = Arc::new(move |stream| {
        *observed_in_handler.lock().unwrap() = caller_name(&stream.context()).to_string();
        Ok(())
    });

    // The wire: outgoing metadata becomes the server stream's incoming
    // metadata.
    let streamer: Streamer = Arc::new(move |ctx, desc| {
        let incoming = outgoing_metadata(&ctx).cloned().unwrap_or_default();
        let server_ctx = with_incoming_metadata(&CallContext::background(), incoming);
        let info = StreamServerInfo {
            full_method: desc.full_method.clone(),
            is_client_stream: desc.client_streams,
            is_server_stream: desc.server_streams,
        };
        let stream = Box::new(WireServerStream { ctx: server_ctx });
        server_chain(stream, info, handler.clone())?;
        Ok(Box::new(WireClientStream) as Box<dyn ClientStream>)
    });

    let client_chain =
        chain_stream_client(vec![None, Some(inject_caller_name_stream("frontend"))])
            .expect("one interceptor");

    let desc = StreamDesc {
        full_method: "/billing.Billing/WatchCharges".to_string(),
        client_streams: false,
        server_streams: true,
    };
    client_chain(CallContext::background(), desc, streamer).unwrap();

    assert_eq!(*observed_caller.lock().unwrap(), "frontend");
}
