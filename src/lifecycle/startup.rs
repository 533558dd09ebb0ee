//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve asset paths and initialize the identity provider
//! - Load templates and build the route table
//! - Wire everything into one [`HttpServer`]
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::auth::{
    AuthVerifier, Authorizer, ProviderCredentials, ProviderInitError, TokenLookupVerifier,
};
use crate::config::{AssetPaths, AuthConfig, ConfigError, GatewayConfig, PathError};
use crate::http::{AppState, HttpServer};
use crate::routing::{RouteTable, RouteTableError};
use crate::templates::{TemplateError, TemplateStore};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("could not resolve asset paths: {0}")]
    Paths(#[from] PathError),

    #[error("error loading templates: {0}")]
    Templates(#[from] TemplateError),

    #[error("error initializing routes: {0}")]
    Routes(#[from] RouteTableError),

    #[error("failed to initialize identity provider: {0}")]
    Provider(#[from] ProviderInitError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(String),

    #[error("failed to watch templates: {0}")]
    Watcher(#[from] notify::Error),
}

/// A fully wired gateway, ready to serve.
pub struct Gateway {
    pub server: HttpServer,
    pub templates: Arc<TemplateStore>,
    pub paths: AssetPaths,
}

/// Build the gateway from configuration and the process environment.
pub fn bootstrap(config: GatewayConfig) -> Result<Gateway, StartupError> {
    let paths = AssetPaths::resolve(&config.assets)?;
    tracing::info!(
        root = %paths.root.display(),
        templates = %paths.templates.display(),
        static_files = %paths.static_files.display(),
        "Asset paths resolved"
    );

    let verifier = init_provider(&config.auth)?;
    assemble(config, paths, verifier)
}

/// Initialize the identity provider client. Done once per process.
pub fn init_provider(config: &AuthConfig) -> Result<Arc<dyn AuthVerifier>, ProviderInitError> {
    let credentials = ProviderCredentials::from_env(config.credentials_file.as_deref())?;
    let verifier = TokenLookupVerifier::new(config, credentials)?;
    Ok(Arc::new(verifier))
}

/// Wire templates, routes and `verifier` into a server.
pub fn assemble(
    config: GatewayConfig,
    paths: AssetPaths,
    verifier: Arc<dyn AuthVerifier>,
) -> Result<Gateway, StartupError> {
    let templates = Arc::new(TemplateStore::load(&paths.templates)?);

    let routes = Arc::new(RouteTable::standard()?);
    tracing::info!(routes = routes.len(), "Routes initialized");

    let state = AppState {
        routes,
        authorizer: Authorizer::new(verifier),
        renderer: templates.clone(),
    };
    let server = HttpServer::new(config, state, &paths.static_files);
    tracing::info!("HTTP server configured");

    Ok(Gateway {
        server,
        templates,
        paths,
    })
}

/// Bind the configured listener address.
pub async fn bind(config: &GatewayConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
