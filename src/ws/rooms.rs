use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::room::{Room, RoomHandle};
use super::typing::TypingSlot;

/// All rooms of the process, created on first join and kept for its
/// lifetime. Every room shares the one typing slot.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, RoomHandle>>>,
    typing: TypingSlot,
    queue_capacity: usize,
}

impl RoomRegistry {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            typing: TypingSlot::new(),
            queue_capacity,
        }
    }

    /// Get or create the room called `name`
    pub async fn get_or_create(&self, name: &str) -> RoomHandle {
        if let Some(room) = self.rooms.read().await.get(name) {
            return room.clone();
        }
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(name.to_string())
            .or_insert_with(|| Room::spawn(name, self.queue_capacity, self.typing.clone()))
            .clone()
    }

    pub fn typing(&self) -> &TypingSlot {
        &self.typing
    }

    pub async fn handles(&self) -> Vec<RoomHandle> {
        self.rooms.read().await.values().cloned().collect()
    }
}
