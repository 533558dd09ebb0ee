//! Shared fixtures for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use zingira_gateway::auth::{AuthError, AuthVerifier, Authorizer, Identity};
use zingira_gateway::config::AssetPaths;
use zingira_gateway::routing::RouteTable;
use zingira_gateway::templates::{RenderError, TemplateRenderer, TemplateStore};
use zingira_gateway::{AppState, GatewayConfig, HttpServer};

pub const VALID_TOKEN: &str = "valid-token";
pub const VALID_SUBJECT: &str = "user-42";
/// Held by the verifier far longer than any test timeout.
pub const SLOW_TOKEN: &str = "slow-token";

/// Accepts only [`VALID_TOKEN`]. [`SLOW_TOKEN`] stalls before being rejected.
pub struct FixedTokenVerifier;

#[async_trait]
impl AuthVerifier for FixedTokenVerifier {
    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        if token == SLOW_TOKEN {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        }
        if token == VALID_TOKEN {
            let claims = json!({ "email": "user@zingira.test" });
            Ok(Identity::new(
                VALID_SUBJECT,
                claims.as_object().cloned().unwrap_or_else(Map::new),
            ))
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Delegates to a real store but panics when asked for one template.
pub struct PanickingRenderer {
    pub inner: Arc<TemplateStore>,
    pub panic_on: &'static str,
}

impl TemplateRenderer for PanickingRenderer {
    fn render(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        if name == self.panic_on {
            panic!("boom while rendering {name}");
        }
        self.inner.render(name, data)
    }
}

/// A temporary project tree with templates and static files.
pub struct Assets {
    _tmp: TempDir,
    pub paths: AssetPaths,
}

const LAYOUT: &str = "<html><body>{% block content %}{% endblock %}</body></html>";

fn page(body: &str) -> String {
    format!("{{% extends \"base.layout.html\" %}}{{% block content %}}{body}{{% endblock %}}")
}

/// Write every application page. Error pages are left out so the built-in one is used.
pub fn asset_tree() -> Assets {
    let tmp = tempfile::tempdir().unwrap();
    let templates = tmp.path().join("frontend/templates");
    let static_files = tmp.path().join("frontend/static");
    fs::create_dir_all(&templates).unwrap();
    fs::create_dir_all(static_files.join("css")).unwrap();

    fs::write(templates.join("base.layout.html"), LAYOUT).unwrap();
    let pages = [
        ("home.page.html", page("<h1>{{ title }}</h1>")),
        ("about.page.html", page("about-marker")),
        ("login.page.html", page("login-marker")),
        ("signup.page.html", page("signup-marker")),
        ("dashboard.page.html", page("dashboard for {{ user.subject }}")),
        ("pickup.page.html", page("pickup for {{ user.subject }}")),
    ];
    for (name, source) in pages {
        fs::write(templates.join(name), source).unwrap();
    }

    fs::write(static_files.join("css/style.css"), "body { color: green; }").unwrap();
    fs::write(static_files.join("app.exe"), "MZ").unwrap();

    let paths = AssetPaths {
        root: tmp.path().to_path_buf(),
        templates,
        static_files,
    };
    Assets { _tmp: tmp, paths }
}

pub fn write_template(dir: &Path, name: &str, source: &str) {
    fs::write(dir.join(name), source).unwrap();
}

/// Build an application state over `renderer` with the fixed-token verifier.
pub fn state_with(renderer: Arc<dyn TemplateRenderer>) -> AppState {
    AppState {
        routes: Arc::new(RouteTable::standard().unwrap()),
        authorizer: Authorizer::new(Arc::new(FixedTokenVerifier)),
        renderer,
    }
}

/// The fully layered router over `assets`.
pub fn router(assets: &Assets) -> Router {
    let store = Arc::new(TemplateStore::load(&assets.paths.templates).unwrap());
    router_with(assets, store)
}

pub fn router_with(assets: &Assets, renderer: Arc<dyn TemplateRenderer>) -> Router {
    HttpServer::new(
        GatewayConfig::default(),
        state_with(renderer),
        &assets.paths.static_files,
    )
    .router()
}

/// The fully layered router over `assets` with custom limits.
pub fn router_with_config(assets: &Assets, config: GatewayConfig) -> Router {
    let store = Arc::new(TemplateStore::load(&assets.paths.templates).unwrap());
    HttpServer::new(config, state_with(store), &assets.paths.static_files).router()
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn get_with_auth(path: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
