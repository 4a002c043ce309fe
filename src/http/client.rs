//! Instrumented HTTP client factory.
//!
//! # Responsibilities
//! - Turn an [`HttpClientConfig`] into a ready-to-use [`HttpClient`]
//! - Apply the default timeout when none is configured
//! - Assemble the service stack around the base transport
//!
//! # Service Stack
//! ```text
//! HttpClient::send
//!     → TimeoutLayer (global per-call deadline)
//!     → SetRequestHeaderLayer (default User-Agent)
//!     → LoggingLayer (correlation ID + dumps)
//!     → transport (reqwest by default)
//! ```

use std::time::Duration;

use http::{header, HeaderValue, Request, Response};
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_http::set_header::SetRequestHeaderLayer;

use crate::http::body::{Body, BoxError};
use crate::http::error::HttpError;
use crate::http::logging::LoggingLayer;
use crate::http::transport::{ReqwestTransport, TransportError};

/// Timeout used when the configured one is zero.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

/// User-Agent sent when the caller sets none.
pub const DEFAULT_USER_AGENT: &str = concat!("elb-probe/", env!("CARGO_PKG_VERSION"));

/// Settings of the instrumented client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Prepended to request/response log lines.
    pub log_prefix: String,
    /// Global timeout of each call. Zero selects [`DEFAULT_CLIENT_TIMEOUT`].
    pub timeout: Duration,
}

impl HttpClientConfig {
    /// Create a configuration.
    pub fn new(log_prefix: impl Into<String>, timeout: Duration) -> Self {
        Self {
            log_prefix: log_prefix.into(),
            timeout,
        }
    }

    /// Timeout the built client will enforce.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_CLIENT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Build a client on top of the default reqwest transport.
    pub fn build(&self) -> Result<HttpClient, HttpError> {
        let transport = ReqwestTransport::new(self.effective_timeout())?;
        Ok(self.with_transport(transport))
    }

    /// Build a client on top of a custom transport.
    pub fn with_transport<T>(&self, transport: T) -> HttpClient
    where
        T: Service<Request<Body>, Response = Response<Body>, Error = TransportError>
            + Clone
            + Send
            + Sync
            + 'static,
        T::Future: Send + 'static,
    {
        let timeout = self.effective_timeout();
        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(SetRequestHeaderLayer::if_not_present(
                header::USER_AGENT,
                HeaderValue::from_static(DEFAULT_USER_AGENT),
            ))
            .layer(LoggingLayer::new(self.log_prefix.as_str()))
            .service(transport);

        HttpClient {
            service: BoxCloneSyncService::new(service),
            timeout,
        }
    }
}

/// HTTP client whose exchanges are all logged and time-bounded.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpClient {
    service: BoxCloneSyncService<Request<Body>, Response<Body>, BoxError>,
    timeout: Duration,
}

impl HttpClient {
    /// Effective timeout of every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute one exchange.
    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>, HttpError> {
        let timeout = self.timeout;
        self.service
            .clone()
            .oneshot(request)
            .await
            .map_err(|err| HttpError::from_stack(err, timeout))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::body;
    use http::StatusCode;

    async fn echo_user_agent(request: Request<Body>) -> Result<Response<Body>, TransportError> {
        let agent = request
            .headers()
            .get(header::USER_AGENT)
            .map(|v| v.as_bytes().to_vec())
            .unwrap_or_default();
        Ok(Response::new(body::full(agent)))
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = HttpClientConfig::new("", Duration::ZERO);
        assert_eq!(config.effective_timeout(), Duration::from_secs(15));
        let client = config.with_transport(tower::service_fn(echo_user_agent));
        assert_eq!(client.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_explicit_timeout_is_kept() {
        let config = HttpClientConfig::new("elb", Duration::from_secs(5));
        let client = config.with_transport(tower::service_fn(echo_user_agent));
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_default_user_agent_is_added() {
        let client = HttpClientConfig::default().with_transport(tower::service_fn(echo_user_agent));
        let request = Request::builder()
            .uri("http://localhost/")
            .body(body::empty())
            .unwrap();

        let response = client.send(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let agent = body::collect(response.into_body()).await.unwrap();
        assert_eq!(agent, DEFAULT_USER_AGENT.as_bytes());
    }

    #[tokio::test]
    async fn test_caller_user_agent_is_kept() {
        let client = HttpClientConfig::default().with_transport(tower::service_fn(echo_user_agent));
        let request = Request::builder()
            .uri("http://localhost/")
            .header(header::USER_AGENT, "custom/1.0")
            .body(body::empty())
            .unwrap();

        let response = client.send(request).await.unwrap();
        let agent = body::collect(response.into_body()).await.unwrap();
        assert_eq!(agent, "custom/1.0".as_bytes());
    }

    #[tokio::test]
    async fn test_slow_transport_times_out() {
        let slow = tower::service_fn(|_request: Request<Body>| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, TransportError>(Response::new(body::empty()))
        });
        let client = HttpClientConfig::new("", Duration::from_millis(50)).with_transport(slow);
        let request = Request::builder()
            .uri("http://localhost/")
            .body(body::empty())
            .unwrap();

        let err = client.send(request).await.unwrap_err();
        assert!(matches!(err, HttpError::Timeout(d) if d == Duration::from_millis(50)));
    }
}
