use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::{models::{ApiError, FileEntry}, state::AppState};

/// List all stored documents
pub async fn file_list(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<FileEntry>>), ApiError> {
    let entries = state.store.list().await.map_err(|e| {
        error!("Failed to list documents: {}", e);
        ApiError::from(e)
    })?;

    let files = entries
        .into_iter()
        .map(|e| FileEntry { name: e.name, id: e.id })
        .collect();
    Ok((StatusCode::OK, Json(files)))
}
