//! Cloud API collaborators.
//!
//! # Data Flow
//! ```text
//! AkskAuthOptions
//!     → identity.rs (endpoint check, project lookup) → ProviderClient
//!     → signer.rs signs every call (SDK-HMAC-SHA256)
//!     → http::HttpClient sends it (logged, time-bounded)
//!     → elb/ (list + paginate + extract)
//! ```
//!
//! # Design Decisions
//! - Only the calls the probe needs are implemented
//! - Resource records type the common fields and keep the rest as JSON

pub mod elb;
pub mod error;
pub mod identity;
pub mod signer;

pub use error::ApiError;
pub use identity::{authenticate, AkskAuthOptions, AuthError, ProviderClient};
pub use signer::Signer;
