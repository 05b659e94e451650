//! Common types used by both HTTP middleware chains.

use bytes::Bytes;
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;

/// A boxed future, the return shape of every async middleware stage.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The HTTP request type used in the middleware chains.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware chains.
pub type Response = http::Response<Full<Bytes>>;

/// Builds a shallow copy of `req` with an independently owned header map.
///
/// A client middleware that wants to alter the outbound request must mutate
/// a copy: the composed transport is shared across concurrent calls and the
/// caller's request stays untouched. The body is a cheap handle clone, not a
/// byte copy.
#[must_use]
pub fn clone_with_headers(req: &Request) -> Request {
    let mut copy = http::Request::new(req.body().clone());
    *copy.method_mut() = req.method().clone();
    *copy.uri_mut() = req.uri().clone();
    *copy.version_mut() = req.version();
    *copy.headers_mut() = req.headers().clone();
    copy
}

/// Builds a JSON response with the given status.
#[must_use]
pub fn json_response(status: http::StatusCode, body: Vec<u8>) -> Response {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("statically valid response parts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_has_independent_headers() {
        let original: Request = http::Request::builder()
            .method(http::Method::POST)
            .uri("/v1/things")
            .header("x-one", "1")
            .body(Full::new(Bytes::from_static(b"payload")))
            .unwrap();

        let mut copy = clone_with_headers(&original);
        copy.headers_mut()
            .insert("x-two", http::HeaderValue::from_static("2"));

        assert_eq!(copy.method(), http::Method::POST);
        assert_eq!(copy.uri(), "/v1/things");
        assert!(copy.headers().contains_key("x-one"));
        assert!(!original.headers().contains_key("x-two"));
    }

    #[test]
    fn json_response_sets_content_type() {
        let resp = json_response(http::StatusCode::OK, b"{}".to_vec());
        assert_eq!(
            resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
