use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Document store reachable", body = HealthResponse),
        (status = 503, description = "Document store unavailable", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Room and host diagnostics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Counters", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

/// List stored documents
#[utoipa::path(
    get,
    path = "/api/files",
    responses(
        (status = 200, description = "Stored documents", body = Vec<FileEntry>),
        (status = 500, description = "Listing failed", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn file_list_doc() {}

/// Get a stored document
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    params(
        ("id" = String, Path, description = "Document id"),
        ("If-None-Match" = Option<String>, Header, description = "Previously seen etag")
    ),
    responses(
        (status = 200, description = "Document content, ETag header set", body = FileResponse),
        (status = 304, description = "Unchanged since the given etag"),
        (status = 404, description = "No such document", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn file_get_doc() {}

/// Save content under a new name
#[utoipa::path(
    post,
    path = "/api/files",
    request_body = CreateFileRequest,
    responses(
        (status = 201, description = "Created", body = CreateFileResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn file_create_doc() {}

/// Replace a stored document
#[utoipa::path(
    put,
    path = "/api/files/{id}",
    request_body = UpdateFileRequest,
    params(
        ("id" = String, Path, description = "Document id"),
        ("If-Match" = Option<String>, Header, description = "Etag the caller last read")
    ),
    responses(
        (status = 200, description = "Updated, new ETag header set", body = UpdateFileResponse),
        (status = 404, description = "No such document", body = ErrorResponse),
        (status = 412, description = "Document changed since the given etag", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn file_update_doc() {}

/// Delete a stored document
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Deleted or already absent", body = DeleteFileResponse)
    )
)]
#[allow(dead_code)]
pub async fn file_delete_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        diagnostics_doc,
        file_list_doc,
        file_get_doc,
        file_create_doc,
        file_update_doc,
        file_delete_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            DiagnosticsResponse,
            FileEntry,
            FileResponse,
            CreateFileRequest,
            CreateFileResponse,
            UpdateFileRequest,
            UpdateFileResponse,
            DeleteFileResponse,
        )
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
