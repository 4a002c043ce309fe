//! AK/SK load balancer probe with an instrumented HTTP client.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags / TOML file
//!          │
//!          ▼
//!   ┌─────────────┐    ┌──────────────────────────────────────────────┐
//!   │   config    │───▶│                 lifecycle                    │
//!   └─────────────┘    │  authenticate → list listeners → list ELBs   │
//!                      └──────────────────────┬───────────────────────┘
//!                                             │
//!                                             ▼
//!                      ┌──────────────────────────────────────────────┐
//!                      │ cloud: identity + signer + elb (pagination)  │
//!                      └──────────────────────┬───────────────────────┘
//!                                             │ signed requests
//!                                             ▼
//!                      ┌──────────────────────────────────────────────┐
//!                      │ http: timeout → user-agent → logging         │
//!                      │       (correlation ID, full dumps) → reqwest │
//!                      └──────────────────────────────────────────────┘
//! ```

pub mod cloud;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProbeConfig;
pub use error::ProbeError;
pub use http::{HttpClient, HttpClientConfig};
