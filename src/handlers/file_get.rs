use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::{
    models::{api_error, ApiError, FileResponse},
    state::AppState,
    store::{Conditional, StoreError},
};

/// Get a stored document, honoring `If-None-Match`
pub async fn file_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    // An unreadable If-None-Match names no etag, so the full body is sent
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());

    let result = match if_none_match {
        Some(known) => state.store.read_if_changed(&id, known).await,
        None => state.store.read(&id).await.map(Conditional::Modified),
    };

    match result {
        Ok(Conditional::NotModified { etag }) => {
            debug!("Document '{}' not modified", id);
            Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response())
        }
        Ok(Conditional::Modified(file)) => Ok((
            StatusCode::OK,
            [(header::ETAG, file.etag)],
            Json(FileResponse {
                name: file.id.clone(),
                id: file.id,
                content: file.content,
            }),
        )
            .into_response()),
        // An invalid id names nothing that could exist
        Err(StoreError::InvalidName(_)) | Err(StoreError::NotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, format!("Document '{}' not found", id)))
        }
        Err(e) => {
            error!("Failed to read document '{}': {}", id, e);
            Err(e.into())
        }
    }
}
