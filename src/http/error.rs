//! Errors surfaced by [`HttpClient`](crate::http::HttpClient).

use std::time::Duration;

use crate::http::body::BoxError;
use crate::http::transport::TransportError;

/// Errors from building or using the instrumented client.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The underlying reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    /// The exchange did not complete within the client timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport failed without producing a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Any other failure raised inside the service stack.
    #[error("HTTP client error: {0}")]
    Other(BoxError),
}

impl HttpError {
    /// Classify an error coming out of the boxed service stack.
    pub(crate) fn from_stack(err: BoxError, timeout: Duration) -> Self {
        if err.is::<tower::timeout::error::Elapsed>() {
            return Self::Timeout(timeout);
        }
        match err.downcast::<TransportError>() {
            Ok(transport) if transport.is_timeout() => Self::Timeout(timeout),
            Ok(transport) => Self::Transport(*transport),
            Err(other) => Self::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_maps_to_timeout() {
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let classified = HttpError::from_stack(err, Duration::from_secs(15));
        assert!(matches!(classified, HttpError::Timeout(d) if d == Duration::from_secs(15)));
    }

    #[test]
    fn test_transport_error_is_unwrapped() {
        let err: BoxError = Box::new(TransportError::new("connection refused"));
        let classified = HttpError::from_stack(err, Duration::from_secs(1));
        match classified {
            HttpError::Transport(transport) => {
                assert_eq!(transport.to_string(), "transport error: connection refused")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_error_is_kept() {
        let err: BoxError = "boom".into();
        let classified = HttpError::from_stack(err, Duration::from_secs(1));
        assert!(matches!(classified, HttpError::Other(_)));
    }
}
