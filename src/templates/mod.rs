//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! templates dir (*.page.html, *.layout.html)
//!     → store.rs (parse all, build TemplateCache snapshot, atomic swap)
//!     → renderer.rs (TemplateRenderer::render by page name)
//!     → on NotFound / RenderError: fallback.rs (hard-coded error page)
//!
//! On change (optional):
//!     watcher.rs detects change → store.reload()
//! ```

pub mod fallback;
pub mod renderer;
pub mod store;
pub mod watcher;

pub use renderer::{fallback_response, render_response, RenderError, TemplateRenderer};
pub use store::{TemplateCache, TemplateError, TemplateStore};
pub use watcher::TemplateWatcher;
