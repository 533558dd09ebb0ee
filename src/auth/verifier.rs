//! Bearer credential verification.
//!
//! # Responsibilities
//! - Parse the `Authorization` header (`Bearer <token>`)
//! - Delegate token verification to the identity provider
//! - Map every outcome to an [`AuthError`] the route checker can answer with
//!
//! # Design Decisions
//! - One [`Authorizer`] per process, shared by reference
//! - Header problems are reported separately from rejected tokens
//! - Provider outages fail closed

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::sync::Arc;
use thiserror::Error;

use crate::auth::identity::Identity;
use crate::observability::metrics;

const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a request could not be authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Invalid authorization header format")]
    InvalidFormat,

    #[error("Invalid token")]
    InvalidToken,

    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl AuthError {
    /// Response body for the 401.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "Authorization header required",
            AuthError::InvalidFormat => "Invalid authorization header format",
            AuthError::InvalidToken | AuthError::ProviderUnavailable(_) => "Invalid token",
        }
    }

    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::InvalidFormat => "invalid_format",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ProviderUnavailable(_) => "provider_unavailable",
        }
    }
}

/// Verifies an opaque bearer token with an identity provider.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Extract the token from an `Authorization` header value.
pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidFormat)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }
    Ok(token)
}

/// The single authorization decision point for protected routes.
#[derive(Clone)]
pub struct Authorizer {
    verifier: Arc<dyn AuthVerifier>,
}

impl Authorizer {
    pub fn new(verifier: Arc<dyn AuthVerifier>) -> Self {
        Self { verifier }
    }

    /// Authenticate a request from its headers.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let result = self.check(headers).await;
        if let Err(e) = &result {
            metrics::record_auth_rejection(e.reason());
        }
        result
    }

    async fn check(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
        let value = value.to_str().map_err(|_| AuthError::InvalidFormat)?;
        if value.is_empty() {
            return Err(AuthError::MissingHeader);
        }

        let token = parse_bearer(value)?;
        self.verifier.verify_token(token).await
    }
}
