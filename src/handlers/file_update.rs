use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use crate::{
    models::{api_error, ApiError, UpdateFileRequest, UpdateFileResponse},
    state::AppState,
    store::StoreError,
};

/// Replace a stored document, honoring `If-Match`
pub async fn file_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateFileRequest>,
) -> Result<Response, ApiError> {
    // A present but unreadable If-Match can never match
    let if_match = match headers.get(header::IF_MATCH).map(|v| v.to_str()) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
            warn!("Unreadable If-Match on update of '{}'", id);
            return Err(api_error(StatusCode::PRECONDITION_FAILED, "Precondition Failed"));
        }
    };

    match state.store.update(&id, &request.content, if_match).await {
        Ok(file) => {
            info!("Document '{}' updated", id);
            Ok((
                StatusCode::OK,
                [(header::ETAG, file.etag.clone())],
                Json(UpdateFileResponse {
                    name: file.id.clone(),
                    id: file.id,
                    content: file.content,
                    etag: file.etag,
                }),
            )
                .into_response())
        }
        Err(StoreError::InvalidName(_)) | Err(StoreError::NotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, format!("Document '{}' not found", id)))
        }
        Err(e @ StoreError::PreconditionFailed { .. }) => {
            warn!("Stale update of '{}': {}", id, e);
            Err(api_error(StatusCode::PRECONDITION_FAILED, "Precondition Failed"))
        }
        Err(e) => {
            error!("Failed to update document '{}': {}", id, e);
            Err(e.into())
        }
    }
}
