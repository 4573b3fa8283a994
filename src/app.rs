//! Router assembly

use crate::{
    auth::{api as auth_api, require_auth, AuthState},
    middleware::request_logging,
};
use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// CORS for the browser client. Cookies only flow cross-origin when a
/// concrete origin is allowed with credentials.
pub fn cors_layer(client_origin: Option<&str>) -> Result<CorsLayer> {
    match client_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid client origin: {}", origin))?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE]))
        }
        None => Ok(CorsLayer::permissive()),
    }
}

/// Build the full application router
pub fn build_router(auth_state: AuthState, cors: CorsLayer) -> Router {
    // Protected routes
    let protected_routes = Router::new()
        .route("/validate", get(auth_api::validate))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ));

    let auth_routes = Router::new()
        .route("/signup", post(auth_api::sign_up))
        .route("/login", post(auth_api::sign_in))
        .route("/logout", post(auth_api::sign_out).get(auth_api::sign_out));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(protected_routes)
        .with_state(auth_state)
        .layer(middleware::from_fn(request_logging))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer() {
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some("http://localhost:3000")).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }
}
