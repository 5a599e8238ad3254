pub mod handler;
pub mod msg_file_handler;
pub mod msg_ping_handler;
pub mod msg_presence_handler;
pub mod msg_update_handler;
pub mod session_ctx;

pub use handler::{websocket_handler, websocket_room_handler};
