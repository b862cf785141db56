use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /health - liveness, never touches storage
pub async fn health_get() -> ApiResult<HealthStatus> {
    Ok(ApiResponse::success(HealthStatus { status: "ok" }))
}

/// GET /health/ready - readiness, pings the database
pub async fn ready_get(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    state.repository.ping().await.map_err(|e| {
        tracing::error!("Readiness check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;
    Ok(ApiResponse::success(HealthStatus { status: "ok" }))
}
