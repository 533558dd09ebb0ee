//! Route validation and authorization.
//!
//! Consults the route table once per request and, for protected routes, the
//! authorizer once. Forwarded page requests carry a [`RequestContext`].

use axum::{
    body::Body,
    extract::State,
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::RequestContext;
use crate::http::error::ClientError;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::routing::Classification;

/// Decide whether a request may reach its handler.
///
/// `Ok(None)` forwards a static asset request, `Ok(Some(ctx))` forwards a page request.
pub async fn authorize_request(
    state: &AppState,
    parts: &Parts,
) -> Result<Option<RequestContext>, ClientError> {
    let path = parts.uri.path();

    let context = || RequestContext::new(parts.method.clone(), path, request_id(&parts.headers));

    match state.routes.classify(path) {
        Classification::Static { permitted: true } => Ok(None),
        Classification::Static { permitted: false } => {
            tracing::warn!(path = %path, "Static file type not permitted");
            Err(ClientError::Forbidden)
        }
        Classification::Unknown => {
            tracing::debug!(path = %path, "No route matched");
            Err(ClientError::NotFound)
        }
        Classification::Public(_) => Ok(Some(context())),
        Classification::Protected(route) => {
            match state.authorizer.authorize(&parts.headers).await {
                Ok(identity) => {
                    tracing::debug!(path = %route.path, subject = %identity.subject(), "Request authenticated");
                    Ok(Some(context().with_identity(identity)))
                }
                Err(e) => {
                    tracing::warn!(path = %route.path, reason = e.reason(), error = %e, "Authentication failed");
                    Err(ClientError::Unauthenticated(e))
                }
            }
        }
    }
}

/// Middleware form of [`authorize_request`].
pub async fn check_route(State(state): State<AppState>, request: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    match authorize_request(&state, &parts).await {
        Ok(Some(ctx)) => {
            parts.extensions.insert(ctx);
            next.run(Request::from_parts(parts, body)).await
        }
        Ok(None) => next.run(Request::from_parts(parts, body)).await,
        Err(rejection) => rejection.into_response_with(state.renderer.as_ref()),
    }
}
