use tracing::{error, warn};
use crate::models::messages::UpdateMessage;
use super::session_ctx::SessionCtx;

/// Handle UpdateMessage - validate and hand to the room, which applies and broadcasts
pub async fn handle_update_message(update_msg: UpdateMessage, ctx: &SessionCtx) {
    let payload = match update_msg.into_payload() {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Dropping update from {} in room {}: {}", ctx.session, ctx.room.name(), e);
            return;
        }
    };

    if let Err(e) = ctx.room.update(ctx.session, payload).await {
        error!("Failed to forward update for room {}: {}", ctx.room.name(), e);
    }
}
