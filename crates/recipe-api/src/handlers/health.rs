//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use recipe_service::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Liveness probe
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness probe; pings the database when the server is database backed
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let db_healthy = match state.service_context().pool() {
        Some(pool) => pool.acquire().await.is_ok(),
        None => true,
    };

    let status = if db_healthy {
        StatusCode::OK
    } else {
        tracing::warn!("Readiness check failed: database unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse::ready(db_healthy)))
}
