//! Rendering interface and response helpers.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::http::error::ServerError;
use crate::templates::fallback;

/// Errors returned by a [`TemplateRenderer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No page template with this name is in the cache.
    #[error("Template {0} not found")]
    NotFound(String),

    /// The template exists but failed to execute against the data.
    #[error("Error rendering template {name}: {reason}")]
    Failed { name: String, reason: String },
}

impl RenderError {
    /// HTTP status for the fallback page.
    pub fn status(&self) -> StatusCode {
        match self {
            RenderError::NotFound(_) => StatusCode::NOT_FOUND,
            RenderError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client. Execution details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            RenderError::NotFound(name) => format!("Template {} not found", name),
            RenderError::Failed { .. } => "Error rendering template".to_string(),
        }
    }
}

/// Renders named page templates.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, data: &Value) -> Result<String, RenderError>;
}

/// Render `name` into a response with `status`, or the fallback page on failure.
pub fn render_response(
    renderer: &dyn TemplateRenderer,
    status: StatusCode,
    name: &str,
    data: &Value,
) -> Response {
    match renderer.render(name, data) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            let server_err = ServerError::from(&err);
            tracing::error!(error = %server_err, "Template render failed");
            fallback_response(&err)
        }
    }
}

/// Fallback page for a render error.
pub fn fallback_response(err: &RenderError) -> Response {
    let status = err.status();
    (status, Html(fallback::error_page(status, &err.public_message()))).into_response()
}
