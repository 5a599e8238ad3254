use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::models::messages::{
    DocumentMessage, SendMessage, TypingMessage, UpdatePayload, UsersMessage,
};

use super::document::Document;
use super::error::SyncError;
use super::registry::{SessionId, SessionRegistry};
use super::typing::{TypingHolder, TypingSlot};

/// Per-session queue of events headed for the socket
pub type Outbound = mpsc::UnboundedSender<SendMessage>;

#[derive(Debug)]
pub enum RoomCommand {
    Join {
        outbound: Outbound,
        reply: oneshot::Sender<SessionId>,
    },
    Leave {
        session: SessionId,
    },
    Update {
        session: SessionId,
        payload: UpdatePayload,
    },
    SetName {
        session: SessionId,
        name: String,
    },
    StartTyping {
        session: SessionId,
    },
    StopTyping {
        session: SessionId,
    },
    Snapshot {
        reply: oneshot::Sender<DocumentMessage>,
    },
    Stats {
        reply: oneshot::Sender<RoomStats>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomStats {
    pub sessions: usize,
    /// Whether the process-wide typer is in this room
    pub typing: bool,
    pub document_bytes: usize,
}

/// Coordinator owning one room's document and sessions.
///
/// Runs as a single task; each command is handled to completion before the
/// next one is taken off the queue. Typing changes made by other rooms
/// arrive through the shared `TypingSlot` and are relayed between commands.
pub struct Room {
    name: String,
    document: Document,
    registry: SessionRegistry,
    peers: HashMap<SessionId, Outbound>,
    typing: TypingSlot,
    typing_rx: watch::Receiver<Option<TypingHolder>>,
    /// Typer last announced to this room's sessions
    typing_shown: Option<String>,
}

impl Room {
    pub fn new(name: impl Into<String>, typing: TypingSlot) -> Self {
        let typing_rx = typing.subscribe();
        let typing_shown = typing_rx.borrow().as_ref().map(|h| h.name.clone());
        Self {
            name: name.into(),
            document: Document::default(),
            registry: SessionRegistry::new(),
            peers: HashMap::new(),
            typing_shown,
            typing,
            typing_rx,
        }
    }

    /// Start the coordinator task and return a handle to its queue
    pub fn spawn(name: impl Into<String>, capacity: usize, typing: TypingSlot) -> RoomHandle {
        let room = Room::new(name, typing);
        let name = room.name.clone();
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(room.run(rx));
        info!("Room '{}' started", name);
        RoomHandle { name, tx }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<RoomCommand>) {
        loop {
            tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
                // The sender lives in `self.typing`, so this never errors
                Ok(()) = self.typing_rx.changed() => self.relay_typing(),
            }
        }
        debug!("Room '{}' queue closed", self.name);
    }

    fn handle(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { outbound, reply } => {
                let session = self.on_join(outbound);
                if reply.send(session).is_err() {
                    // Caller went away before learning its id
                    self.on_leave(session);
                }
            }
            RoomCommand::Leave { session } => self.on_leave(session),
            RoomCommand::Update { session, payload } => self.on_update(session, payload),
            RoomCommand::SetName { session, name } => self.on_set_name(session, &name),
            RoomCommand::StartTyping { session } => self.on_start_typing(session),
            RoomCommand::StopTyping { session } => self.on_stop_typing(session),
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.document.snapshot());
            }
            RoomCommand::Stats { reply } => {
                let _ = reply.send(RoomStats {
                    sessions: self.registry.len(),
                    typing: self.typing.held_in(&self.name),
                    document_bytes: self.document.content().len(),
                });
            }
        }
    }

    fn on_join(&mut self, outbound: Outbound) -> SessionId {
        // Bring existing peers up to date before the newcomer is told the typer
        self.relay_typing();

        let session = self.registry.connect();
        self.peers.insert(session, outbound);
        info!("Session {} joined room '{}'", session, self.name);

        self.send_to(session, SendMessage::Init(self.document.snapshot()));
        if let Some(user) = &self.typing_shown {
            let typing = SendMessage::Typing(TypingMessage {
                user: Some(user.clone()),
            });
            self.send_to(session, typing);
        }
        self.broadcast_presence();
        session
    }

    fn on_leave(&mut self, session: SessionId) {
        self.peers.remove(&session);
        if !self.registry.disconnect(session) {
            return;
        }
        info!("Session {} left room '{}'", session, self.name);
        if self.typing.stop(&self.name, session) {
            self.relay_typing();
        }
        self.broadcast_presence();
    }

    fn on_update(&mut self, session: SessionId, payload: UpdatePayload) {
        if !self.registry.contains(session) {
            warn!("Dropping update from unknown session {} in room '{}'", session, self.name);
            return;
        }
        match self.document.apply(payload) {
            Ok(()) => {
                debug!(
                    "Room '{}' updated by {} ({} bytes)",
                    self.name,
                    session,
                    self.document.content().len()
                );
                self.broadcast(SendMessage::Update(self.document.snapshot()), Some(session));
            }
            Err(e @ (SyncError::StaleBase { .. } | SyncError::Delta(_))) => {
                warn!("Rejected update from {} in room '{}': {}", session, self.name, e);
                self.send_to(session, SendMessage::Resync(self.document.snapshot()));
            }
            Err(e) => {
                warn!("Rejected update from {} in room '{}': {}", session, self.name, e);
            }
        }
    }

    fn on_set_name(&mut self, session: SessionId, name: &str) {
        let Some(stored) = self.registry.set_name(session, name).map(str::to_string) else {
            return;
        };
        debug!("Session {} is now '{}'", session, stored);
        self.broadcast_presence();
        if self.typing.rename(&self.name, session, &stored) {
            self.relay_typing();
        }
    }

    fn on_start_typing(&mut self, session: SessionId) {
        let Some(name) = self.registry.name(session).map(str::to_string) else {
            return;
        };
        self.typing.start(&self.name, session, &name);
        self.relay_typing();
    }

    fn on_stop_typing(&mut self, session: SessionId) {
        if self.typing.stop(&self.name, session) {
            self.relay_typing();
        }
    }

    /// Announce the current typer to this room if it differs from what the
    /// room was last told.
    fn relay_typing(&mut self) {
        let user = self.typing_rx.borrow_and_update().as_ref().map(|h| h.name.clone());
        if user == self.typing_shown {
            return;
        }
        self.typing_shown = user.clone();
        self.broadcast(SendMessage::Typing(TypingMessage { user }), None);
    }

    fn broadcast_presence(&self) {
        let users = self.registry.presence_snapshot();
        self.broadcast(SendMessage::Users(UsersMessage { users }), None);
    }

    fn send_to(&self, session: SessionId, msg: SendMessage) {
        if let Some(peer) = self.peers.get(&session) {
            if peer.send(msg).is_err() {
                debug!("Outbound queue of {} is closed", session);
            }
        }
    }

    /// Send `msg` to every session except `except`
    fn broadcast(&self, msg: SendMessage, except: Option<SessionId>) {
        for (session, peer) in &self.peers {
            if Some(*session) == except {
                continue;
            }
            if peer.send(msg.clone()).is_err() {
                debug!("Outbound queue of {} is closed", session);
            }
        }
    }
}

/// Cloneable handle onto a running room
#[derive(Clone, Debug)]
pub struct RoomHandle {
    name: String,
    tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), SyncError> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| SyncError::RoomClosed(self.name.clone()))
    }

    /// Register a session. The room sends it `init` through `outbound`.
    pub async fn join(&self, outbound: Outbound) -> Result<SessionId, SyncError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join { outbound, reply }).await?;
        rx.await.map_err(|_| SyncError::RoomClosed(self.name.clone()))
    }

    pub async fn leave(&self, session: SessionId) -> Result<(), SyncError> {
        self.send(RoomCommand::Leave { session }).await
    }

    pub async fn update(
        &self,
        session: SessionId,
        payload: UpdatePayload,
    ) -> Result<(), SyncError> {
        self.send(RoomCommand::Update { session, payload }).await
    }

    pub async fn set_name(&self, session: SessionId, name: String) -> Result<(), SyncError> {
        self.send(RoomCommand::SetName { session, name }).await
    }

    pub async fn start_typing(&self, session: SessionId) -> Result<(), SyncError> {
        self.send(RoomCommand::StartTyping { session }).await
    }

    pub async fn stop_typing(&self, session: SessionId) -> Result<(), SyncError> {
        self.send(RoomCommand::StopTyping { session }).await
    }

    /// Current authoritative content. Also a barrier: every command queued
    /// before it has been handled once it returns.
    pub async fn snapshot(&self) -> Result<DocumentMessage, SyncError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| SyncError::RoomClosed(self.name.clone()))
    }

    pub async fn stats(&self) -> Result<RoomStats, SyncError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Stats { reply }).await?;
        rx.await.map_err(|_| SyncError::RoomClosed(self.name.clone()))
    }
}
