
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Live room counters plus host load
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub n_rooms: u32,
    /// Connected sessions across all rooms
    pub n_sessions: u32,
    /// Rooms with someone typing
    pub n_typing: u32,
    /// Total UTF-8 size of the live room documents
    pub document_bytes: u64,
    /// Documents in the store
    pub n_files: u32,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
