use tracing::{debug, error};
use crate::models::messages::SetNameMessage;
use super::session_ctx::SessionCtx;

/// Handle SetNameMessage
pub async fn handle_set_name_message(msg: SetNameMessage, ctx: &SessionCtx) {
    debug!("Session {} sets name in room {}", ctx.session, ctx.room.name());
    if let Err(e) = ctx.room.set_name(ctx.session, msg.name).await {
        error!("Failed to set name in room {}: {}", ctx.room.name(), e);
    }
}

pub async fn handle_start_typing(ctx: &SessionCtx) {
    if let Err(e) = ctx.room.start_typing(ctx.session).await {
        error!("Failed to start typing in room {}: {}", ctx.room.name(), e);
    }
}

pub async fn handle_stop_typing(ctx: &SessionCtx) {
    if let Err(e) = ctx.room.stop_typing(ctx.session).await {
        error!("Failed to stop typing in room {}: {}", ctx.room.name(), e);
    }
}
