use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::error::ApiError;

/// Resolve the caller's `Scope` from the bearer token and attach it to the request.
/// Handlers read it back with `Extension<Scope>`.
pub async fn require_scope(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))
        })
        .transpose()?;

    let scope = auth::read_scope(header).map_err(|e| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), e);
        ApiError::unauthorized(e.to_string())
    })?;

    request.extensions_mut().insert(scope);
    Ok(next.run(request).await)
}
