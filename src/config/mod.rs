//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → args.rs (command-line flags / OS_* environment)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable)
//!     → passed by reference to startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no process-wide globals
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::Cli;
pub use loader::{load_config, ConfigError};
pub use schema::{
    Credentials, HttpConfig, IdentityConfig, LogFormat, ObservabilityConfig, ProbeConfig,
};
pub use validation::ValidationError;
