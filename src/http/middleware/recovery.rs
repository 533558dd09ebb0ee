//! Fault boundary. Panics from any inner stage become a 500.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::handlers;
use crate::http::error::ServerError;
use crate::http::middleware::cors;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::templates::fallback;

/// Run the inner chain, converting a panic into a generic 500 response.
///
/// The panic message is logged with method and path and never reaches the
/// client. The response carries the CORS headers, since the CORS stage never
/// got to see it.
pub async fn recover(State(state): State<AppState>, request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let err = ServerError::from_panic(payload.as_ref());
            tracing::error!(method = %method, path = %path, error = %err, "Panic recovered");
            metrics::record_panic();

            let mut response = std::panic::catch_unwind(AssertUnwindSafe(|| {
                handlers::internal_error_page(state.renderer.as_ref())
            }))
            .unwrap_or_else(|_| {
                tracing::error!("Error page panicked, using built-in page");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Html(fallback::error_page(status, "Internal Server Error"))).into_response()
            });
            cors::apply_headers(response.headers_mut());
            response
        }
    }
}
