//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::GatewayResult;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub fn create_health_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/health", get(health_check))
}

/// Liveness plus a round trip to the store
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Store unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn health_check(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<HealthResponse>> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
