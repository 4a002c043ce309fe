//! Body type carried through the client stack.
//!
//! Requests and responses use a boxed body so that the logging layer can
//! buffer a body for dumping and hand an equivalent one to the next service.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::Frame;
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full};

/// Boxed error used by bodies and the tower stack.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body of every request and response handled by the client.
pub type Body = BoxBody<Bytes, BoxError>;

/// Body holding the given bytes.
pub fn full(bytes: impl Into<Bytes>) -> Body {
    Full::new(bytes.into()).map_err(|never| match never {}).boxed()
}

/// Body without content.
pub fn empty() -> Body {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

/// Body that fails on first read with the given message.
///
/// Stands in for a body whose original read already failed, so the next
/// reader observes the same failure instead of silently empty content.
pub fn failed(message: impl Into<String>) -> Body {
    FailedBody {
        message: Some(message.into()),
    }
    .boxed()
}

/// Read a body to completion.
pub async fn collect(body: Body) -> Result<Bytes, BoxError> {
    Ok(body.collect().await?.to_bytes())
}

struct FailedBody {
    message: Option<String>,
}

impl http_body::Body for FailedBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.message.take().map(|message| Err(message.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_body_round_trips_bytes() {
        let bytes = collect(full("payload")).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"payload"));
    }

    #[tokio::test]
    async fn test_empty_body() {
        assert!(collect(empty()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_body_reports_message() {
        let err = collect(failed("connection reset")).await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }
}
