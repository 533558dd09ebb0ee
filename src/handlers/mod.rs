//! Request handlers: one per page plus the shared error pages.

pub mod errors;
pub mod pages;

pub use errors::{error_page, fallback, forbidden_page, internal_error_page, not_found_page};
pub use pages::Page;
