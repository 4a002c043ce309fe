//! Top-level error of a probe run.

use thiserror::Error;

use crate::cloud::elb::ElbError;
use crate::cloud::AuthError;
use crate::config::ConfigError;
use crate::http::HttpError;

/// Any condition that ends the run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Missing or invalid configuration; raised before any network activity.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be created.
    #[error("HTTP client creation failed: {0}")]
    Client(#[from] HttpError),

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Listing or extracting resources failed.
    #[error("{stage} failed: {source}")]
    Elb {
        stage: &'static str,
        #[source]
        source: ElbError,
    },
}

impl ProbeError {
    pub(crate) fn elb(stage: &'static str) -> impl FnOnce(ElbError) -> Self {
        move |source| Self::Elb { stage, source }
    }

    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Client(_) | Self::Auth(_) | Self::Elb { .. } => 1,
        }
    }
}
