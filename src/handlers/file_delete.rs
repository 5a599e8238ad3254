use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::{
    models::{ApiError, DeleteFileResponse},
    state::AppState,
    store::StoreError,
};

/// Delete a stored document. Absent documents count as deleted.
pub async fn file_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteFileResponse>), ApiError> {
    match state.store.delete(&id).await {
        Ok(()) | Err(StoreError::InvalidName(_)) => {
            info!("Document '{}' deleted", id);
            Ok((StatusCode::OK, Json(DeleteFileResponse { success: true })))
        }
        Err(e) => {
            error!("Failed to delete document '{}': {}", id, e);
            Err(e.into())
        }
    }
}
