//! Base transport: the service that actually puts a request on the wire.
//!
//! # Responsibilities
//! - Define the transport contract used by the logging layer
//! - Provide the default reqwest-backed transport
//!
//! # Design Decisions
//! - A transport is any `tower::Service<Request<Body>>` answering with
//!   `Response<Body>` or a [`TransportError`]
//! - A `TransportError` may still carry a response; the logging layer
//!   returns that response and drops the error
//! - Response bodies are buffered by the default transport so the whole
//!   exchange falls under the client timeout

use std::fmt;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use http::{Request, Response};
use tower::Service;

use crate::http::body::{self, Body, BoxError};

/// Failure reported by a transport.
pub struct TransportError {
    source: BoxError,
    response: Option<Response<Body>>,
}

impl TransportError {
    /// Error without a response.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
            response: None,
        }
    }

    /// Error that came with a response anyway.
    pub fn with_response(source: impl Into<BoxError>, response: Response<Body>) -> Self {
        Self {
            source: source.into(),
            response: Some(response),
        }
    }

    /// Whether a response is attached.
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Detach the response, if any.
    pub fn take_response(&mut self) -> Option<Response<Body>> {
        self.response.take()
    }

    /// Whether the failure was a reqwest-level timeout.
    pub fn is_timeout(&self) -> bool {
        self.source
            .downcast_ref::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_timeout)
    }
}

impl fmt::Debug for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportError")
            .field("source", &self.source)
            .field("has_response", &self.has_response())
            .finish()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.source)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Transport backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose client enforces `timeout` per request.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Service<Request<Body>> for ReqwestTransport {
    type Response = Response<Body>;
    type Error = TransportError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let client = self.client.clone();

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let bytes = body::collect(body).await.map_err(TransportError::new)?;
            let request = reqwest::Request::try_from(Request::from_parts(parts, bytes))
                .map_err(TransportError::new)?;

            let response = client.execute(request).await.map_err(TransportError::new)?;

            let status = response.status();
            let version = response.version();
            let headers = response.headers().clone();
            let bytes = response.bytes().await.map_err(TransportError::new)?;

            let mut response = Response::new(body::full(bytes));
            *response.status_mut() = status;
            *response.version_mut() = version;
            *response.headers_mut() = headers;
            Ok(response)
        })
    }
}
