//! Request logging middleware.
//!
//! One line per request: method, path, status code and latency. Cookies and
//! bodies are never logged since they carry session tokens and passwords.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, warn};

pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Skip logging for health checks to reduce noise
    if path == "/health" {
        return next.run(request).await;
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    match status {
        s if s.is_server_error() => warn!(
            method = %method,
            path = %path,
            status = s.as_u16(),
            latency_ms,
            "Request failed (5xx)"
        ),
        s if s == StatusCode::UNAUTHORIZED => debug!(
            method = %method,
            path = %path,
            latency_ms,
            "Request rejected by auth gate"
        ),
        s => info!(
            method = %method,
            path = %path,
            status = s.as_u16(),
            latency_ms,
            "Request completed"
        ),
    }

    response
}
