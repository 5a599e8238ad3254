//! Load / save requests arriving on the socket.
//!
//! Answered to the requesting session only, in the order they were sent.
//! Loading never touches the room document; saving persists the room's
//! current content.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::models::messages::{
    FileErrorMessage, FileMessage, FileUnchangedMessage, LoadMessage, SaveMessage, SaveNewMessage,
    SavedMessage, SendMessage,
};
use crate::store::{Conditional, StoreError};

use super::session_ctx::SessionCtx;

/// A file request queued for the session's file worker
#[derive(Debug)]
pub enum FileRequest {
    Load(LoadMessage),
    SaveNew(SaveNewMessage),
    Save(SaveMessage),
}

/// Serve one session's file requests one at a time, off the read loop.
///
/// Ends once the session drops its sender and the queue is drained.
pub async fn run_file_requests(
    mut requests: mpsc::UnboundedReceiver<FileRequest>,
    ctx: SessionCtx,
) {
    while let Some(request) = requests.recv().await {
        match request {
            FileRequest::Load(msg) => handle_load_message(msg, &ctx).await,
            FileRequest::SaveNew(msg) => handle_save_new_message(msg, &ctx).await,
            FileRequest::Save(msg) => handle_save_message(msg, &ctx).await,
        }
    }
    debug!("File worker for session {} finished", ctx.session);
}

fn file_error(ctx: &SessionCtx, op: &str, err: StoreError) {
    warn!("{} failed for session {}: {}", op, ctx.session, err);
    ctx.reply(SendMessage::FileError(FileErrorMessage {
        op: op.to_string(),
        code: err.code().to_string(),
        error: err.to_string(),
    }));
}

/// Handle LoadMessage
pub async fn handle_load_message(msg: LoadMessage, ctx: &SessionCtx) {
    let result = match &msg.etag {
        Some(known) => ctx.store.read_if_changed(&msg.id, known).await,
        None => ctx.store.read(&msg.id).await.map(Conditional::Modified),
    };

    match result {
        Ok(Conditional::Modified(file)) => ctx.reply(SendMessage::File(FileMessage {
            name: file.id.clone(),
            id: file.id,
            content: file.content,
            etag: file.etag,
        })),
        Ok(Conditional::NotModified { etag }) => {
            ctx.reply(SendMessage::FileUnchanged(FileUnchangedMessage { id: msg.id, etag }))
        }
        Err(e) => file_error(ctx, "load", e),
    }
}

/// Handle SaveNewMessage - persist the room document under a new name
pub async fn handle_save_new_message(msg: SaveNewMessage, ctx: &SessionCtx) {
    let snapshot = match ctx.room.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return file_error(ctx, "saveNew", StoreError::Io(e.to_string())),
    };

    match ctx.store.create(&msg.name, &snapshot.content).await {
        Ok(created) => {
            info!("Session {} saved room {} as '{}'", ctx.session, ctx.room.name(), created.id);
            ctx.reply(SendMessage::Saved(SavedMessage {
                name: created.id.clone(),
                id: created.id,
                etag: created.etag,
            }))
        }
        Err(e) => file_error(ctx, "saveNew", e),
    }
}

/// Handle SaveMessage - overwrite an existing document with the room document
pub async fn handle_save_message(msg: SaveMessage, ctx: &SessionCtx) {
    let snapshot = match ctx.room.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return file_error(ctx, "save", StoreError::Io(e.to_string())),
    };

    match ctx
        .store
        .update(&msg.id, &snapshot.content, msg.etag.as_deref())
        .await
    {
        Ok(file) => {
            info!("Session {} saved room {} over '{}'", ctx.session, ctx.room.name(), file.id);
            ctx.reply(SendMessage::Saved(SavedMessage {
                name: file.id.clone(),
                id: file.id,
                etag: file.etag,
            }))
        }
        Err(e) => file_error(ctx, "save", e),
    }
}
