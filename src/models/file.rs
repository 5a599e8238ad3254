use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entry of `GET /api/files`
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub id: String,
}

/// Body of `GET /api/files/:id`
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct FileResponse {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Body of `POST /api/files`
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct CreateFileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct CreateFileResponse {
    pub id: String,
    pub name: String,
    pub etag: String,
}

/// Body of `PUT /api/files/:id`
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct UpdateFileRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct UpdateFileResponse {
    pub id: String,
    pub name: String,
    pub content: String,
    pub etag: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct DeleteFileResponse {
    pub success: bool,
}
