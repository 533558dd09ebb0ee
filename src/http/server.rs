//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one handler per exact route table entry
//! - Serve subtree routes from the fallback
//! - Mount static file serving under `/static/`
//! - Wire up the middleware chain in its fixed order
//! - Bind server to listener and shut down gracefully

use axum::{middleware, Router};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
};

use crate::auth::Authorizer;
use crate::config::GatewayConfig;
use crate::handlers;
use crate::http::middleware::{check_route, cors, log_requests, recover};
use crate::http::request::UuidRequestId;
use crate::routing::{RouteTable, STATIC_PREFIX};
use crate::templates::TemplateRenderer;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub authorizer: Authorizer,
    pub renderer: Arc<dyn TemplateRenderer>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving static files from `static_dir`.
    pub fn new(config: GatewayConfig, state: AppState, static_dir: &Path) -> Self {
        let router = Self::build_router(&config, state, static_dir);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers listed last wrap outermost, so requests flow
    /// request-id → logger → recovery → cors → timeout → route checker → handler.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState, static_dir: &Path) -> Router {
        let mut pages = Router::new();
        for route in state.routes.iter().filter(|route| !route.is_subtree()) {
            pages = pages.route(route.path, route.page.method_router());
        }

        pages
            .nest_service(STATIC_PREFIX.trim_end_matches('/'), ServeDir::new(static_dir))
            .fallback(handlers::fallback)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(middleware::from_fn_with_state(state.clone(), check_route))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(middleware::from_fn(cors))
            .layer(middleware::from_fn_with_state(state.clone(), recover))
            .layer(middleware::from_fn(log_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .with_state(state)
    }

    /// Router with every layer applied, for in-process dispatch.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
