//! Request-time error taxonomy.
//!
//! Client errors are answered by the stage that detects them. Server errors
//! are logged in full and answered with a generic page.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;
use thiserror::Error;

use crate::auth::AuthError;
use crate::handlers;
use crate::templates::{RenderError, TemplateRenderer};

/// Request rejected because of what the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(AuthError),

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,
}

impl ClientError {
    pub fn status(&self) -> StatusCode {
        match self {
            ClientError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ClientError::Forbidden => StatusCode::FORBIDDEN,
            ClientError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Build the terminal response. 403 and 404 use the error pages.
    pub fn into_response_with(self, renderer: &dyn TemplateRenderer) -> Response {
        match self {
            ClientError::Unauthenticated(e) => {
                let mut response =
                    (StatusCode::UNAUTHORIZED, e.public_message()).into_response();
                response
                    .headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ClientError::Forbidden => handlers::forbidden_page(renderer),
            ClientError::NotFound => handlers::not_found_page(renderer),
        }
    }
}

/// Unexpected failure inside the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    #[error("template missing: {0}")]
    TemplateMissing(String),

    #[error("render failure: {0}")]
    RenderFailure(String),

    #[error("panic recovered: {0}")]
    PanicRecovered(String),
}

impl ServerError {
    /// Convert a caught panic payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ServerError::PanicRecovered(message)
    }
}

impl From<&RenderError> for ServerError {
    fn from(err: &RenderError) -> Self {
        match err {
            RenderError::NotFound(name) => ServerError::TemplateMissing(name.clone()),
            RenderError::Failed { name, reason } => {
                ServerError::RenderFailure(format!("{}: {}", name, reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_panic_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(
            ServerError::from_panic(payload.as_ref()),
            ServerError::PanicRecovered("boom".into())
        );

        let payload: Box<dyn Any + Send> = Box::new(format!("index {}", 3));
        assert_eq!(
            ServerError::from_panic(payload.as_ref()),
            ServerError::PanicRecovered("index 3".into())
        );

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert!(ServerError::from_panic(payload.as_ref())
            .to_string()
            .contains("non-string"));
    }

    #[test]
    fn test_client_error_status() {
        assert_eq!(
            ClientError::Unauthenticated(AuthError::MissingHeader).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ClientError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ClientError::NotFound.status(), StatusCode::NOT_FOUND);
    }
}
