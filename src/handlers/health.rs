use axum::Json;

use crate::models::HealthResponse;

/// Liveness probe
/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "photodrop server is running".to_string(),
    })
}
