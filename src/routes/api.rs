use crate::{handlers::*, state::AppState};
use axum::{routing::get, Router};

/// Create API routes
pub fn create_api_routes() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .route("/files", get(file_list).post(file_create))
        .route("/files/:id", get(file_get).put(file_update).delete(file_delete))
}
