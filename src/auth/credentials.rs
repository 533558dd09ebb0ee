//! Identity provider credential loading.
//!
//! Sources, first match wins:
//! 1. `FIREBASE_CREDENTIALS_JSON` (inline JSON)
//! 2. `auth.credentials_file`, then `FIREBASE_CREDENTIALS_FILE` (JSON file)
//! 3. `FIREBASE_PROJECT_ID` + `FIREBASE_API_KEY`
//!
//! `FIREBASE_API_KEY` also fills in a key missing from the JSON sources.
//! Secrets are never logged.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::auth::provider::ProviderInitError;

pub const ENV_CREDENTIALS_JSON: &str = "FIREBASE_CREDENTIALS_JSON";
pub const ENV_CREDENTIALS_FILE: &str = "FIREBASE_CREDENTIALS_FILE";
pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const ENV_API_KEY: &str = "FIREBASE_API_KEY";

/// Credentials needed to call the token lookup API.
#[derive(Clone, Deserialize)]
pub struct ProviderCredentials {
    pub project_id: String,

    #[serde(default, alias = "apiKey")]
    pub api_key: String,

    #[serde(default)]
    pub client_email: Option<String>,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .finish()
    }
}

impl ProviderCredentials {
    /// Load credentials from the process environment.
    pub fn from_env(credentials_file: Option<&Path>) -> Result<Self, ProviderInitError> {
        Self::from_sources(|key| std::env::var(key).ok(), credentials_file)
    }

    /// Load credentials using `lookup` for environment variables.
    pub fn from_sources<F>(lookup: F, credentials_file: Option<&Path>) -> Result<Self, ProviderInitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut creds = if let Some(json) = env(ENV_CREDENTIALS_JSON) {
            serde_json::from_str::<Self>(&json)
                .map_err(|e| ProviderInitError::Credentials(format!("{}: {}", ENV_CREDENTIALS_JSON, e)))?
        } else if let Some(path) = credentials_file
            .map(Path::to_path_buf)
            .or_else(|| env(ENV_CREDENTIALS_FILE).map(PathBuf::from))
        {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ProviderInitError::Credentials(format!("{}: {}", path.display(), e))
            })?;
            serde_json::from_str::<Self>(&content).map_err(|e| {
                ProviderInitError::Credentials(format!("{}: {}", path.display(), e))
            })?
        } else {
            Self {
                project_id: env(ENV_PROJECT_ID).unwrap_or_default(),
                api_key: String::new(),
                client_email: None,
            }
        };

        if creds.api_key.is_empty() {
            creds.api_key = env(ENV_API_KEY).unwrap_or_default();
        }

        if creds.project_id.trim().is_empty() {
            return Err(ProviderInitError::Credentials("project_id is missing".into()));
        }
        if creds.api_key.trim().is_empty() {
            return Err(ProviderInitError::Credentials("api_key is missing".into()));
        }

        Ok(creds)
    }
}
