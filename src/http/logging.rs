//! Request/response logging layer.
//!
//! # Responsibilities
//! - Assign every exchange a [`CorrelationId`]
//! - Log a full dump of the request before forwarding it
//! - Log a full dump of the response under the same identifier
//!
//! # Design Decisions
//! - Dumps include every header, `Authorization` included; keep the log
//!   level at `info` or lower only where such output is acceptable
//! - Dump failures are logged at `warn` and never abort the exchange
//! - Only the prefix and the wrapped transport are shared between calls

use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use http::{Request, Response};
use tower::{Layer, Service};

use crate::http::body::Body;
use crate::http::correlation::CorrelationId;
use crate::http::dump::{dump_request, dump_response};
use crate::http::transport::TransportError;

/// Layer wrapping a transport with [`LoggingService`].
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: Arc<str>,
}

impl LoggingLayer {
    /// Create a layer whose log lines carry `prefix`.
    pub fn new(prefix: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingService {
            inner,
            prefix: Arc::clone(&self.prefix),
        }
    }
}

/// Transport decorator logging each request and response.
///
/// # Caller hazard
/// When the wrapped transport fails but still hands back a response
/// ([`TransportError::with_response`]), this service logs that response and
/// returns it as `Ok`. The transport error is dropped. Callers must judge
/// the outcome by the response status alone.
///
/// When the transport fails without a response, its error is returned as is
/// and no response line is logged.
#[derive(Debug, Clone)]
pub struct LoggingService<S> {
    inner: S,
    prefix: Arc<str>,
}

impl<S> LoggingService<S> {
    /// Prefix written to every log line.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<S> Service<Request<Body>> for LoggingService<S>
where
    S: Service<Request<Body>, Response = Response<Body>, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = TransportError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // Call the instance that was poll_ready'd, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let prefix = Arc::clone(&self.prefix);

        Box::pin(async move {
            let correlation_id = CorrelationId::new();

            let (request, dump) = dump_request(request).await;
            let dump = dump.unwrap_or_else(|err| {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Error occurred while dumping request"
                );
                err.partial
            });
            tracing::info!(
                prefix = %prefix,
                correlation_id = %correlation_id,
                dump = %String::from_utf8_lossy(&dump),
                "request sent"
            );

            let response = match call_boxed(&mut inner, request).await {
                Ok(response) => response,
                Err(mut err) => match err.take_response() {
                    Some(response) => {
                        tracing::debug!(
                            correlation_id = %correlation_id,
                            error = %err,
                            "Transport error dropped, response present"
                        );
                        response
                    }
                    None => return Err(err),
                },
            };

            let (response, dump) = dump_response(response).await;
            let dump = dump.unwrap_or_else(|err| {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Error occurred while dumping response"
                );
                err.partial
            });
            tracing::info!(
                prefix = %prefix,
                correlation_id = %correlation_id,
                dump = %String::from_utf8_lossy(&dump),
                "request received"
            );

            Ok(response)
        })
    }
}

/// Box the inner call so its future is a concrete `Send` type.
fn call_boxed<S>(
    inner: &mut S,
    request: Request<Body>,
) -> BoxFuture<'static, Result<Response<Body>, TransportError>>
where
    S: Service<Request<Body>, Response = Response<Body>, Error = TransportError>,
    S::Future: Send + 'static,
{
    Box::pin(inner.call(request))
}
