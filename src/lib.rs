//! Real-time shared text editing: a room coordinator that owns the
//! authoritative document and fans changes out over websockets, plus a
//! file store with etag-based conditional reads and writes.

pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod websocket;
pub mod ws;

pub use routes::create_app;
pub use state::AppState;
