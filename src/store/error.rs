use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised by a document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Name or id outside the allowed charset / length
    #[error("Invalid name '{0}'")]
    InvalidName(String),

    #[error("Document '{0}' not found")]
    NotFound(String),

    #[error("Document '{0}' already exists")]
    AlreadyExists(String),

    /// The caller's If-Match etag no longer matches the stored content
    #[error("Precondition failed for '{id}': expected {expected}, current {current}")]
    PreconditionFailed {
        id: String,
        expected: String,
        current: String,
    },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl StoreError {
    /// HTTP status the file API answers with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::InvalidName(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
            StoreError::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
            StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable code, used on the realtime channel
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidName(_) => "invalidName",
            StoreError::NotFound(_) => "notFound",
            StoreError::AlreadyExists(_) => "alreadyExists",
            StoreError::PreconditionFailed { .. } => "preconditionFailed",
            StoreError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_http_status() {
        assert_eq!(
            StoreError::InvalidName("a/b".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::AlreadyExists("notes".into()).status_code(),
            StatusCode::CONFLICT
        );
        let stale = StoreError::PreconditionFailed {
            id: "notes".into(),
            expected: "\"a\"".into(),
            current: "\"b\"".into(),
        };
        assert_eq!(stale.status_code(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(stale.code(), "preconditionFailed");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
