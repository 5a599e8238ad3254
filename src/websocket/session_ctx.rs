use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::models::messages::SendMessage;
use crate::store::DocumentStore;
use crate::ws::{Outbound, RoomHandle, SessionId};

/// Everything a message handler needs to act for one connection
#[derive(Clone)]
pub struct SessionCtx {
    pub session: SessionId,
    pub room: RoomHandle,
    pub outbound: Outbound,
    pub store: Arc<dyn DocumentStore>,
    pub typing_idle: Duration,
}

impl SessionCtx {
    /// Queue a message for this connection only
    pub fn reply(&self, msg: SendMessage) {
        if self.outbound.send(msg).is_err() {
            debug!("Session {} is gone, dropping reply", self.session);
        }
    }
}
