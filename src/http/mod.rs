//! Instrumented HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! caller (identity / elb)
//!     → client.rs (timeout, default headers)
//!     → logging.rs (correlation ID, request dump → log)
//!     → transport.rs (reqwest, actual network I/O)
//!     → logging.rs (response dump → log)
//!     → caller
//! ```

pub mod body;
pub mod client;
pub mod correlation;
pub mod dump;
pub mod error;
pub mod logging;
pub mod transport;

pub use body::{Body, BoxError};
pub use client::{HttpClient, HttpClientConfig, DEFAULT_CLIENT_TIMEOUT};
pub use correlation::CorrelationId;
pub use error::HttpError;
pub use logging::{LoggingLayer, LoggingService};
pub use transport::{ReqwestTransport, TransportError};
