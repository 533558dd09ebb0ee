//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Template and static asset locations.
    pub assets: AssetsConfig,

    /// Identity provider settings.
    pub auth: AuthConfig,

    /// Per-request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Asset locations.
///
/// Relative directories are resolved against the project root, which is either
/// `project_root` or the nearest ancestor of the working directory that
/// contains `root_marker`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Explicit project root. Skips marker detection when set.
    pub project_root: Option<PathBuf>,

    /// File whose presence marks the project root.
    pub root_marker: String,

    /// Directory holding `*.page.html` and `*.layout.html` templates.
    pub templates_dir: PathBuf,

    /// Directory served under `/static/`.
    pub static_dir: PathBuf,

    /// Reload templates when files in `templates_dir` change.
    pub watch_templates: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            root_marker: "Cargo.toml".to_string(),
            templates_dir: PathBuf::from("frontend/templates"),
            static_dir: PathBuf::from("frontend/static"),
            watch_templates: false,
        }
    }
}

/// Identity provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL of the token lookup API.
    pub endpoint: String,

    /// Timeout for a single verification call in seconds.
    pub timeout_secs: u64,

    /// Service credentials JSON file. `FIREBASE_CREDENTIALS_JSON` takes precedence.
    pub credentials_file: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://identitytoolkit.googleapis.com".to_string(),
            timeout_secs: 5,
            credentials_file: None,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Total time allowed for one request in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.assets.templates_dir, PathBuf::from("frontend/templates"));
        assert_eq!(config.limits.request_timeout_secs, 30);
    }
}
