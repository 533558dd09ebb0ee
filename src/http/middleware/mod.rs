//! Middleware chain, outermost first:
//!
//! ```text
//! logger → recovery → cors → timeout → route_checker → handler
//! ```
//!
//! Each stage either forwards to the next or answers the request itself.

pub mod cors;
pub mod logger;
pub mod recovery;
pub mod route_checker;

pub use cors::cors;
pub use logger::log_requests;
pub use recovery::recover;
pub use route_checker::{authorize_request, check_route};
