//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build client → Authenticate → List listeners → List load balancers
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → abort the run
//! ```
//!
//! # Design Decisions
//! - Ordered startup: each step needs the previous one
//! - Fail fast: the first error ends the run, nothing is retried

pub mod signals;
pub mod startup;

pub use startup::{run, ProbeReport};
