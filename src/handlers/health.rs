use axum::{extract::State, http::StatusCode, Json};
use crate::{models::HealthResponse, state::AppState};
use tracing::{debug, error};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse::ok("Server is running"))
}

/// Readiness check endpoint: the document store must be listable
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    debug!("Readiness check requested");
    match state.store.list().await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse::ok("Service is ready"))),
        Err(e) => {
            error!("Document store not ready: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unavailable(format!("Document store unavailable: {}", e))),
            )
        }
    }
}

/// Plain-text banner on `/`
pub async fn banner() -> &'static str {
    "Collaborative editor backend is running"
}
