use axum::{
    extract::{Request, State},
    http::{
        header::{CONTENT_TYPE, ORIGIN},
        Method,
    },
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::config::SecurityConfig;
use crate::error::ApiError;

/// Methods accepted by both the CORS layer and the strict request policy
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
];

/// Strict request filter for protected routes. When enabled, a request must come
/// from an allowed origin, declare a JSON body and use an allowed method.
pub async fn request_policy(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(reason) = check_request(&state.config.security, &request) {
        tracing::warn!("Request policy rejected {} {}: {}", request.method(), request.uri().path(), reason);
        return Err(ApiError::forbidden(reason));
    }
    Ok(next.run(request).await)
}

fn check_request(security: &SecurityConfig, request: &Request) -> Result<(), &'static str> {
    if !security.enforce_request_policy {
        return Ok(());
    }

    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !security.cors_origins.iter().any(|allowed| allowed == origin) {
        return Err("Origin not allowed");
    }

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if content_type != "application/json" {
        return Err("Content-Type must be application/json");
    }

    if !ALLOWED_METHODS.contains(request.method()) {
        return Err("Method not allowed");
    }

    Ok(())
}
