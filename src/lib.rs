//! Zingira web gateway library.
//!
//! Serves a small set of server-rendered pages and static assets, with
//! bearer-token protection for the dashboard routes.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod templates;

pub use config::schema::GatewayConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::{Gateway, Shutdown, StartupError};
