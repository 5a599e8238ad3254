use std::sync::Arc;

use crate::config::Config;
use crate::store::DocumentStore;
use crate::ws::RoomRegistry;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub rooms: RoomRegistry,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let rooms = RoomRegistry::new(config.room_queue_capacity);
        Self {
            config: Arc::new(config),
            store,
            rooms,
        }
    }
}
