use crate::{models::{ApiError, DiagnosticsResponse}, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::{Mutex, OnceLock};
use sysinfo::System;
use tracing::{info, warn};

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Report room / session counters and host load
pub async fn diagnostics(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DiagnosticsResponse>), ApiError> {

    // Aggregate diagnostics from the rooms
    let mut n_rooms: u32 = 0;
    let mut n_sessions: u32 = 0;
    let mut n_typing: u32 = 0;
    let mut document_bytes: u64 = 0;
    for room in state.rooms.handles().await {
        n_rooms += 1;
        match room.stats().await {
            Ok(stats) => {
                n_sessions += stats.sessions as u32;
                n_typing += stats.typing as u32;
                document_bytes += stats.document_bytes as u64;
            }
            Err(e) => warn!("No stats for room '{}': {}", room.name(), e),
        }
    }

    // Stored documents; a failing store is reported, not fatal
    let n_files = match state.store.list().await {
        Ok(entries) => entries.len() as u32,
        Err(e) => {
            warn!("Could not list document store: {}", e);
            0
        }
    };

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Sessions: {}, Rooms: {}, Files: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        n_sessions,
        n_rooms,
        n_files
    );

    Ok((
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_rooms,
            n_sessions,
            n_typing,
            document_bytes,
            n_files,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    ))
}
