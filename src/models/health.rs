use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `/api/health` and `/api/ready`
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: "unavailable".to_string(),
            message: message.into(),
        }
    }
}
