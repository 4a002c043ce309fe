//! Human-readable dumps of requests and responses.
//!
//! # Format
//! ```text
//! GET /v3/projects?name=demo HTTP/1.1\r\n
//! host: iam.eu-de.otc.t-systems.com\r\n
//! authorization: SDK-HMAC-SHA256 Access=..., SignedHeaders=..., Signature=...\r\n
//! \r\n
//! <body>
//! ```
//!
//! Responses start with the status line (`HTTP/1.1 200 OK`) instead.
//! Header values are written as raw bytes, secrets included.
//!
//! Dumping reads the body to completion. The returned message carries the
//! buffered bytes, or a body that re-yields the read failure, so the caller
//! can forward it unchanged.

use bytes::{BufMut, Bytes, BytesMut};
use http::{header, HeaderMap, Request, Response};

use crate::http::body::{self, Body, BoxError};

/// Failure to dump a message.
#[derive(Debug, thiserror::Error)]
#[error("failed to read body: {source}")]
pub struct DumpError {
    /// Whatever could be serialized before the failure (the head).
    pub partial: Bytes,
    #[source]
    pub source: BoxError,
}

/// Dump a request, returning the request to forward and its serialization.
pub async fn dump_request(request: Request<Body>) -> (Request<Body>, Result<Bytes, DumpError>) {
    let (parts, body) = request.into_parts();

    let mut head = BytesMut::new();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    head.put_slice(format!("{} {} {:?}\r\n", parts.method, target, parts.version).as_bytes());
    if !parts.headers.contains_key(header::HOST) {
        if let Some(authority) = parts.uri.authority() {
            head.put_slice(format!("host: {}\r\n", authority).as_bytes());
        }
    }
    write_headers(&mut head, &parts.headers);

    let (body, dump) = buffer(head, body).await;
    (Request::from_parts(parts, body), dump)
}

/// Dump a response, returning the response to hand back and its serialization.
pub async fn dump_response(
    response: Response<Body>,
) -> (Response<Body>, Result<Bytes, DumpError>) {
    let (parts, body) = response.into_parts();

    let mut head = BytesMut::new();
    head.put_slice(format!("{:?} {}\r\n", parts.version, parts.status).as_bytes());
    write_headers(&mut head, &parts.headers);

    let (body, dump) = buffer(head, body).await;
    (Response::from_parts(parts, body), dump)
}

fn write_headers(out: &mut BytesMut, headers: &HeaderMap) {
    for (name, value) in headers {
        out.put_slice(name.as_str().as_bytes());
        out.put_slice(b": ");
        out.put_slice(value.as_bytes());
        out.put_slice(b"\r\n");
    }
    out.put_slice(b"\r\n");
}

async fn buffer(mut head: BytesMut, body: Body) -> (Body, Result<Bytes, DumpError>) {
    match body::collect(body).await {
        Ok(bytes) => {
            head.put_slice(&bytes);
            (body::full(bytes), Ok(head.freeze()))
        }
        Err(source) => (
            body::failed(source.to_string()),
            Err(DumpError {
                partial: head.freeze(),
                source,
            }),
        ),
    }
}
