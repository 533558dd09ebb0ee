//! Identity provider client.
//!
//! Tokens are checked by the provider's account lookup API
//! (`POST {endpoint}/v1/accounts:lookup?key=<api key>` with `{"idToken": ...}`),
//! so no signature verification happens in this process.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::auth::credentials::ProviderCredentials;
use crate::auth::identity::Identity;
use crate::auth::verifier::{AuthError, AuthVerifier};
use crate::config::AuthConfig;

/// Lookup response fields that never become claims.
const HIDDEN_FIELDS: &[&str] = &["localId", "passwordHash", "salt"];

/// Provider error codes that mean the token itself was rejected.
const TOKEN_REJECTIONS: &[&str] = &[
    "INVALID_ID_TOKEN",
    "TOKEN_EXPIRED",
    "USER_NOT_FOUND",
    "USER_DISABLED",
    "CREDENTIAL_TOO_OLD_LOGIN_AGAIN",
];

/// Errors raised while setting up the provider client. Fatal at startup.
#[derive(Debug, Error)]
pub enum ProviderInitError {
    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("invalid provider endpoint '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("error building provider client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Verifies ID tokens against the identity provider's lookup endpoint.
///
/// Built once at startup; the inner HTTP client pools connections and is
/// shared by every request.
#[derive(Clone)]
pub struct TokenLookupVerifier {
    client: reqwest::Client,
    lookup_url: Url,
}

impl TokenLookupVerifier {
    pub fn new(config: &AuthConfig, credentials: ProviderCredentials) -> Result<Self, ProviderInitError> {
        let endpoint_err = |source| ProviderInitError::Endpoint {
            endpoint: config.endpoint.clone(),
            source,
        };

        let mut base = Url::parse(&config.endpoint).map_err(endpoint_err)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut lookup_url = base.join("v1/accounts:lookup").map_err(endpoint_err)?;
        lookup_url
            .query_pairs_mut()
            .append_pair("key", &credentials.api_key);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::info!(
            project_id = %credentials.project_id,
            endpoint = %config.endpoint,
            "Identity provider client initialized"
        );

        Ok(Self { client, lookup_url })
    }
}

/// Classify a 400 from the lookup API by its error message.
///
/// Token problems map to `InvalidToken`. Anything else, such as a bad API key,
/// is reported as `ProviderUnavailable`.
fn classify_rejection(message: &str) -> AuthError {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    if TOKEN_REJECTIONS.contains(&code) {
        AuthError::InvalidToken
    } else {
        AuthError::ProviderUnavailable(format!("lookup rejected request: {}", message))
    }
}

#[async_trait]
impl AuthVerifier for TokenLookupVerifier {
    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .post(self.lookup_url.clone())
            .json(&json!({ "idToken": token }))
            .send()
            .await
            // The URL carries the API key; keep it out of the error text.
            .map_err(|e| AuthError::ProviderUnavailable(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_default();
            let err = classify_rejection(&message);
            if matches!(err, AuthError::InvalidToken) {
                tracing::debug!(provider_message = %message, "Token rejected by identity provider");
            } else {
                tracing::error!(provider_message = %message, "Identity provider refused the lookup request");
            }
            return Err(err);
        }
        if !status.is_success() {
            return Err(AuthError::ProviderUnavailable(format!(
                "lookup returned status {}",
                status
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.without_url().to_string()))?;

        let mut user = body.users.into_iter().next().ok_or(AuthError::InvalidToken)?;
        let subject = match user.get("localId").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(AuthError::InvalidToken),
        };
        for field in HIDDEN_FIELDS {
            user.remove(*field);
        }

        Ok(Identity::new(subject, user))
    }
}
