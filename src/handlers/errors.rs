//! Error page handlers for 403, 404 and 500 responses.

use axum::{
    body::Body,
    extract::State,
    http::{header::ALLOW, HeaderValue, Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::auth::RequestContext;
use crate::http::server::AppState;
use crate::templates::{fallback, RenderError, TemplateRenderer};

/// Render `<status>.page.html`, or the built-in error page if it is missing or fails.
///
/// The response always carries `status`.
pub fn error_page(renderer: &dyn TemplateRenderer, status: StatusCode) -> Response {
    let name = format!("{}.page.html", status.as_u16());
    let message = status.canonical_reason().unwrap_or("Error");
    let data = json!({ "status": status.as_u16(), "message": message });

    match renderer.render(&name, &data) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(RenderError::NotFound(_)) => {
            (status, Html(fallback::error_page(status, message))).into_response()
        }
        Err(e) => {
            tracing::error!(template = %name, error = %e, "Error page render failed");
            (status, Html(fallback::error_page(status, message))).into_response()
        }
    }
}

pub fn not_found_page(renderer: &dyn TemplateRenderer) -> Response {
    error_page(renderer, StatusCode::NOT_FOUND)
}

pub fn forbidden_page(renderer: &dyn TemplateRenderer) -> Response {
    error_page(renderer, StatusCode::FORBIDDEN)
}

pub fn internal_error_page(renderer: &dyn TemplateRenderer) -> Response {
    error_page(renderer, StatusCode::INTERNAL_SERVER_ERROR)
}

/// Mux fallback.
///
/// Paths under a subtree route were already authorized by the route checker and
/// render that route's page. Anything else is a 404.
pub async fn fallback(State(state): State<AppState>, request: Request<Body>) -> Response {
    let route = state
        .routes
        .resolve(request.uri().path())
        .filter(|route| route.is_subtree())
        .copied();
    let ctx = request.extensions().get::<RequestContext>();

    match (route, ctx) {
        (Some(route), Some(ctx)) => {
            if request.method() == Method::GET || request.method() == Method::HEAD {
                route.page.respond(&state, ctx)
            } else {
                let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("GET,HEAD"));
                response
            }
        }
        _ => not_found_page(state.renderer.as_ref()),
    }
}
