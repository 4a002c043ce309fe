//! Errors shared by the cloud API clients.

use http::StatusCode;
use url::Url;

use crate::cloud::signer::SignError;
use crate::http::{BoxError, HttpError};

/// Failure of a single signed API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to sign request: {0}")]
    Sign(#[from] SignError),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("failed to read response body from {url}: {source}")]
    Body { url: Url, source: BoxError },

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: Url,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: Url,
        source: serde_json::Error,
    },

    #[error("cannot derive {service} endpoint from {base}: {source}")]
    Endpoint {
        service: String,
        base: Url,
        source: url::ParseError,
    },
}

impl ApiError {
    /// HTTP status of the failed call, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
