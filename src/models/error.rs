use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::StoreError;

/// Response for an error
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub status: String,
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build an error tuple the handlers can return directly
pub fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse {
        code: status.as_u16(),
        status: status.to_string(),
        error: error.into(),
    }))
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        api_error(err.status_code(), err.to_string())
    }
}
