use axum::{
    extract::{Path, State, ws::{Message, WebSocket, WebSocketUpgrade}},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{stream::SplitStream, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::models::messages::{ReceivedMessage, SendMessage};
use crate::state::AppState;
use crate::store::naming;
use crate::websocket::msg_file_handler::{run_file_requests, FileRequest};
use crate::websocket::msg_ping_handler::handle_ping_message;
use crate::websocket::msg_presence_handler::{
    handle_set_name_message, handle_start_typing, handle_stop_typing,
};
use crate::websocket::msg_update_handler::handle_update_message;
use crate::websocket::session_ctx::SessionCtx;

/// WebSocket handler for the default room
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    let room = state.config.default_room.clone();
    upgrade(ws, room, state)
}

/// WebSocket handler for a named room
pub async fn websocket_room_handler(
    Path(room): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    if naming::sanitize(&room).is_err() {
        warn!("Rejected WebSocket connection to invalid room '{}'", room);
        return (StatusCode::BAD_REQUEST, "Invalid room name").into_response();
    }
    upgrade(ws, room, state)
}

fn upgrade(ws: WebSocketUpgrade, room: String, state: AppState) -> Response {
    info!("New WebSocket connection attempt for room {}", room);
    ws.on_upgrade(move |socket| handle_socket(socket, room, state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, room_name: String, state: AppState) {
    let room = state.rooms.get_or_create(&room_name).await;

    // Everything headed for this client goes through one queue
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<SendMessage>();
    let session = match room.join(outbound.clone()).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to join room {}: {}", room_name, e);
            return;
        }
    };
    info!("WebSocket connection established for room {} as session {}", room_name, session);

    // Split the socket into sender and receiver
    let (mut sender, receiver) = socket.split();

    // Drain the outbound queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let ctx = SessionCtx {
        session,
        room: room.clone(),
        outbound,
        store: state.store.clone(),
        typing_idle: state.config.typing_idle(),
    };
    // Serves file requests in order; ends once the read loop drops its sender
    let (files, file_requests) = mpsc::unbounded_channel::<FileRequest>();
    tokio::spawn(run_file_requests(file_requests, ctx.clone()));
    let mut recv_task = tokio::spawn(receive_loop(receiver, ctx, files));

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    if let Err(e) = room.leave(session).await {
        error!("Failed to leave room {}: {}", room_name, e);
    }
    info!("WebSocket connection terminated for session {} in room {}", session, room_name);
}

/// Read client frames until the connection closes.
///
/// Also owns the typing inactivity timer: every `startTyping` re-arms it and
/// expiry stops typing on the client's behalf.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    ctx: SessionCtx,
    files: mpsc::UnboundedSender<FileRequest>,
) {
    let mut typing_deadline: Option<Instant> = None;

    loop {
        let frame = tokio::select! {
            frame = receiver.next() => frame,
            _ = typing_expiry(typing_deadline) => {
                typing_deadline = None;
                debug!("Typing timed out for session {}", ctx.session);
                handle_stop_typing(&ctx).await;
                continue;
            }
        };

        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => break,
            // Binary, ping and pong frames carry nothing for us
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!("Transport error for session {}: {}", ctx.session, e);
                break;
            }
        };

        // Parse the incoming message as JSON
        let msg: ReceivedMessage = match serde_json::from_str(&text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(
                    "Ignoring malformed message from session {} in room {}: {}",
                    ctx.session,
                    ctx.room.name(),
                    e
                );
                continue;
            }
        };

        // Handle different message types
        match msg {
            ReceivedMessage::Update(update_msg) => handle_update_message(update_msg, &ctx).await,
            ReceivedMessage::SetName(name_msg) => handle_set_name_message(name_msg, &ctx).await,
            ReceivedMessage::StartTyping => {
                handle_start_typing(&ctx).await;
                typing_deadline = Some(Instant::now() + ctx.typing_idle);
            }
            ReceivedMessage::StopTyping => {
                typing_deadline = None;
                handle_stop_typing(&ctx).await;
            }
            ReceivedMessage::Ping => handle_ping_message(&ctx),
            ReceivedMessage::Load(load_msg) => {
                queue_file_request(&files, &ctx, FileRequest::Load(load_msg))
            }
            ReceivedMessage::SaveNew(save_msg) => {
                queue_file_request(&files, &ctx, FileRequest::SaveNew(save_msg))
            }
            ReceivedMessage::Save(save_msg) => {
                queue_file_request(&files, &ctx, FileRequest::Save(save_msg))
            }
        }
    }
}

fn queue_file_request(
    files: &mpsc::UnboundedSender<FileRequest>,
    ctx: &SessionCtx,
    request: FileRequest,
) {
    if files.send(request).is_err() {
        error!("File worker for session {} is gone", ctx.session);
    }
}

async fn typing_expiry(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
