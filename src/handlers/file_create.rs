use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use crate::{
    models::{api_error, ApiError, CreateFileRequest, CreateFileResponse},
    state::AppState,
    store::StoreError,
};

/// Save the given content under a new name
pub async fn file_create(
    State(state): State<AppState>,
    Json(request): Json<CreateFileRequest>,
) -> Result<Response, ApiError> {
    let Some(name) = request.name else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid name"));
    };

    match state.store.create(&name, &request.content).await {
        Ok(created) => {
            info!("Document '{}' created", created.id);
            Ok((
                StatusCode::CREATED,
                [(header::ETAG, created.etag.clone())],
                Json(CreateFileResponse {
                    id: created.id,
                    name,
                    etag: created.etag,
                }),
            )
                .into_response())
        }
        Err(e @ (StoreError::InvalidName(_) | StoreError::AlreadyExists(_))) => {
            warn!("Rejected create of '{}': {}", name, e);
            Err(e.into())
        }
        Err(e) => {
            error!("Failed to create document '{}': {}", name, e);
            Err(e.into())
        }
    }
}
