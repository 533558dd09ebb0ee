//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     credentials.rs (env / file) → provider.rs (TokenLookupVerifier, built once)
//!     → verifier.rs (Authorizer wraps Arc<dyn AuthVerifier>)
//!
//! Per protected request:
//!     Authorization header → Authorizer::authorize
//!     → Identity (attached to RequestContext) or AuthError (401)
//! ```
//!
//! # Design Decisions
//! - Token verification is delegated to the provider; nothing is verified locally
//! - Exactly one authorization decision per request
//! - Fail closed when the provider cannot be reached

pub mod credentials;
pub mod identity;
pub mod provider;
pub mod verifier;

pub use credentials::ProviderCredentials;
pub use identity::{Identity, RequestContext};
pub use provider::{ProviderInitError, TokenLookupVerifier};
pub use verifier::{parse_bearer, AuthError, AuthVerifier, Authorizer};
