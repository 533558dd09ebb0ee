//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer order)
//!     → request.rs (request ID)
//!     → middleware/ (logger → recovery → cors → route checker)
//!     → handlers (page or static file)
//!     → error.rs (client/server error responses)
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::{ClientError, ServerError};
pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
