//! Request logging. Outermost application stage; never short-circuits.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::Instrument;

use crate::http::request::request_id;
use crate::observability::metrics;

/// Log method, path and remote address, then the outcome, inside a `request` span.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let request_id = request_id(request.headers()).unwrap_or_else(|| "unknown".to_string());

    let span = tracing::info_span!(
        "request",
        method = %method,
        path = %path,
        request_id = %request_id,
    );

    async move {
        tracing::info!(remote_addr = %remote_addr, "Request received");

        let response = next.run(request).await;
        let status = response.status();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        metrics::record_request(method.as_str(), status.as_u16(), start);

        response
    }
    .instrument(span)
    .await
}
