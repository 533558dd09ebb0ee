//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → table.rs (RouteTable::classify)
//!     → Static { permitted } | Public(route) | Protected(route) | Unknown
//!       (exact routes first, then the longest protected subtree)
//!
//! Startup:
//!     ROUTES → RouteTable::new (reject duplicates) → shared via Arc
//!     → same table registers exact routes on the mux; subtrees are served by the mux fallback
//! ```
//!
//! # Design Decisions
//! - Routes fixed at startup, immutable at runtime
//! - Deterministic: same path always classifies the same way
//! - Unknown paths are an explicit outcome, never a silent default

pub mod table;

pub use table::{
    is_allowed_extension, Access, Classification, Matching, Route, RouteTable, RouteTableError,
    ALLOWED_STATIC_EXTENSIONS, ROUTES, STATIC_PREFIX,
};
