use tracing::debug;
use crate::models::messages::{PongMessage, SendMessage};
use chrono::Utc;
use super::session_ctx::SessionCtx;

/// Handle PingMessage
pub fn handle_ping_message(ctx: &SessionCtx) {
    // Handle ping message - send a pong message back.
    debug!("Ping message received from {} in room {}", ctx.session, ctx.room.name());
    ctx.reply(SendMessage::Pong(PongMessage { date: Utc::now().to_rfc3339() }));
}
