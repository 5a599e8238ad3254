//! Collaboration rooms: the authoritative document, live sessions and the
//! coordinator task that serializes every change to them, plus the typing
//! slot they share.

pub mod document;
pub mod error;
pub mod registry;
pub mod room;
pub mod rooms;
pub mod typing;

pub use error::SyncError;
pub use registry::SessionId;
pub use room::{Outbound, RoomHandle, RoomStats};
pub use rooms::RoomRegistry;
pub use typing::TypingSlot;
