//! End-to-end request handling through the full middleware chain.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use std::sync::Arc;
use tower::ServiceExt;

use common::*;
use zingira_gateway::templates::TemplateStore;
use zingira_gateway::GatewayConfig;

#[tokio::test]
async fn test_public_pages_render() {
    let assets = asset_tree();

    let response = router(&assets).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("<h1>Zingira Tech</h1>"));

    for (path, marker) in [
        ("/about", "about-marker"),
        ("/login", "login-marker"),
        ("/signup", "signup-marker"),
    ] {
        let response = router(&assets).oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(body_string(response).await.contains(marker), "{path}");
    }
}

#[tokio::test]
async fn test_protected_page_requires_header() {
    let assets = asset_tree();

    let response = router(&assets).oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(body_string(response).await, "Authorization header required");
}

#[tokio::test]
async fn test_protected_page_rejects_non_bearer_header() {
    let assets = asset_tree();

    let response = router(&assets)
        .oneshot(get_with_auth("/dashboard", "Basic dXNlcjpwYXNz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_string(response).await,
        "Invalid authorization header format"
    );
}

#[tokio::test]
async fn test_protected_page_rejects_unknown_token() {
    let assets = asset_tree();

    let response = router(&assets)
        .oneshot(get_with_auth("/dashboard/schedule-pickup", "Bearer forged"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(response).await, "Invalid token");
}

#[tokio::test]
async fn test_protected_pages_render_for_valid_token() {
    let assets = asset_tree();
    let auth = format!("Bearer {VALID_TOKEN}");

    let response = router(&assets)
        .oneshot(get_with_auth("/dashboard", &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response)
        .await
        .contains(&format!("dashboard for {VALID_SUBJECT}")));

    let response = router(&assets)
        .oneshot(get_with_auth("/dashboard/schedule-pickup", &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response)
        .await
        .contains(&format!("pickup for {VALID_SUBJECT}")));
}

#[tokio::test]
async fn test_unknown_paths_are_not_found_for_any_method() {
    let assets = asset_tree();

    for (method, path) in [
        (Method::GET, "/nope"),
        (Method::POST, "/nope"),
        (Method::DELETE, "/admin"),
        (Method::GET, "/dashboardx"),
        (Method::GET, "/about/"),
    ] {
        let request = Request::builder()
            .method(method.clone())
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router(&assets).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {path}");
        assert!(body_string(response).await.contains("Error 404"));
    }
}

#[tokio::test]
async fn test_dashboard_subtree_requires_auth() {
    let assets = asset_tree();

    for path in ["/dashboard/", "/dashboard/settings", "/dashboard/a/b"] {
        let response = router(&assets).oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(body_string(response).await, "Authorization header required");
    }
}

#[tokio::test]
async fn test_dashboard_subtree_renders_dashboard() {
    let assets = asset_tree();
    let auth = format!("Bearer {VALID_TOKEN}");

    for path in ["/dashboard/", "/dashboard/settings"] {
        let response = router(&assets)
            .oneshot(get_with_auth(path, &auth))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(body_string(response)
            .await
            .contains(&format!("dashboard for {VALID_SUBJECT}")));
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/dashboard/settings")
        .header("authorization", &auth)
        .body(Body::empty())
        .unwrap();
    let response = router(&assets).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let assets = asset_tree();
    let limit = GatewayConfig::default().limits.max_body_bytes;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_LENGTH, limit + 1)
        .body(Body::from(vec![b'x'; limit + 1]))
        .unwrap();
    let response = router(&assets).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let assets = asset_tree();
    let mut config = GatewayConfig::default();
    config.limits.request_timeout_secs = 1;

    let response = router_with_config(&assets, config)
        .oneshot(get_with_auth("/dashboard", &format!("Bearer {SLOW_TOKEN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_static_files() {
    let assets = asset_tree();

    let response = router(&assets)
        .oneshot(get("/static/css/style.css"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "body { color: green; }");

    let response = router(&assets).oneshot(get("/static/app.exe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_string(response).await.contains("Error 403"));

    let response = router(&assets)
        .oneshot(get("/static/css/missing.css"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preflight_is_answered_for_any_path() {
    let assets = asset_tree();

    for path in ["/dashboard", "/dashboard/settings", "/nope", "/static/app.exe", "/"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router(&assets).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
        assert!(body_string(response).await.is_empty(), "{path}");
    }
}

#[tokio::test]
async fn test_cors_headers_on_rejections() {
    let assets = asset_tree();

    let response = router(&assets).oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let response = router(&assets).oneshot(get("/missing")).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let assets = asset_tree();

    let response = router(&assets).oneshot(get("/about")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/about")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = router(&assets).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_wrong_method_on_known_path() {
    let assets = asset_tree();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/about")
        .body(Body::empty())
        .unwrap();
    let response = router(&assets).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_panic_becomes_500_and_server_keeps_serving() {
    let assets = asset_tree();
    let store = Arc::new(TemplateStore::load(&assets.paths.templates).unwrap());
    let app = router_with(
        &assets,
        Arc::new(PanickingRenderer {
            inner: store,
            panic_on: "about.page.html",
        }),
    );

    let response = app.clone().oneshot(get("/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body = body_string(response).await;
    assert!(body.contains("Error 500"));
    assert!(!body.contains("boom"));

    let response = app.oneshot(get("/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_custom_error_page_used_when_present() {
    let assets = asset_tree();
    write_template(
        &assets.paths.templates,
        "404.page.html",
        "custom {{ status }}: {{ message }}",
    );

    let response = router(&assets).oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "custom 404: Not Found");
}

#[tokio::test]
async fn test_missing_page_template_uses_fallback() {
    let assets = asset_tree();
    std::fs::remove_file(assets.paths.templates.join("about.page.html")).unwrap();

    let response = router(&assets).oneshot(get("/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("Error 404"));
    assert!(body.contains("Template about.page.html not found"));
}
