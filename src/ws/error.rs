use thiserror::Error;

use crate::models::delta::DeltaError;

/// Errors on the realtime path. None of them close the session.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// A delta named a base revision the room has moved past
    #[error("Stale delta base {base}, document is at {current}")]
    StaleBase { base: String, current: String },

    #[error("Delta does not apply: {0}")]
    Delta(#[from] DeltaError),

    #[error("Room '{0}' is no longer running")]
    RoomClosed(String),
}
