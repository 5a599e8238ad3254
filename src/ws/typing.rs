use std::sync::Arc;

use tokio::sync::watch;

use super::registry::SessionId;

/// Session currently holding the typing slot. Session ids are only unique
/// within a room, so the room is part of the key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypingHolder {
    pub room: String,
    pub session: SessionId,
    pub name: String,
}

impl TypingHolder {
    fn is(&self, room: &str, session: SessionId) -> bool {
        self.session == session && self.room == room
    }
}

/// The single, process-wide typing slot.
///
/// Shared by every room; each room subscribes and relays changes to its own
/// sessions. Owns no timers.
#[derive(Clone, Debug)]
pub struct TypingSlot {
    tx: Arc<watch::Sender<Option<TypingHolder>>>,
}

impl Default for TypingSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingSlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TypingHolder>> {
        self.tx.subscribe()
    }

    /// Take the slot, displacing any previous holder in any room.
    pub fn start(&self, room: &str, session: SessionId, name: &str) {
        let holder = TypingHolder {
            room: room.to_string(),
            session,
            name: name.to_string(),
        };
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&holder) {
                return false;
            }
            *current = Some(holder);
            true
        });
    }

    /// Clear the slot if `session` of `room` holds it. Returns whether it was cleared.
    pub fn stop(&self, room: &str, session: SessionId) -> bool {
        self.tx.send_if_modified(|current| {
            if current.as_ref().is_some_and(|h| h.is(room, session)) {
                *current = None;
                true
            } else {
                false
            }
        })
    }

    /// Follow a rename of the holder. Returns whether the shown name changed.
    pub fn rename(&self, room: &str, session: SessionId, name: &str) -> bool {
        self.tx.send_if_modified(|current| match current {
            Some(h) if h.is(room, session) && h.name != name => {
                h.name = name.to_string();
                true
            }
            _ => false,
        })
    }

    pub fn holder(&self) -> Option<TypingHolder> {
        self.tx.borrow().clone()
    }

    /// Display name of the current typer
    pub fn user(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|h| h.name.clone())
    }

    pub fn held_in(&self, room: &str) -> bool {
        self.tx.borrow().as_ref().is_some_and(|h| h.room == room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::registry::SessionRegistry;

    #[test]
    fn one_holder_across_rooms() {
        let mut room_a = SessionRegistry::new();
        let mut room_b = SessionRegistry::new();
        let a = room_a.connect();
        let b = room_b.connect();
        // Same id in different rooms
        assert_eq!(a, b);

        let slot = TypingSlot::new();
        slot.start("a", a, "Ada");
        assert!(slot.held_in("a"));
        slot.start("b", b, "Bea");
        assert_eq!(slot.user(), Some("Bea".to_string()));
        assert!(!slot.held_in("a"));

        // a no longer holds it, even though its id matches
        assert!(!slot.stop("a", a));
        assert_eq!(slot.user(), Some("Bea".to_string()));
        assert!(slot.stop("b", b));
        assert_eq!(slot.holder(), None);
    }

    #[test]
    fn rename_follows_holder_only() {
        let mut reg = SessionRegistry::new();
        let a = reg.connect();
        let b = reg.connect();
        let slot = TypingSlot::new();
        slot.start("main", a, "Guest");

        assert!(!slot.rename("main", b, "Bea"));
        assert!(slot.rename("main", a, "Ada"));
        assert!(!slot.rename("main", a, "Ada"));
        assert_eq!(slot.user(), Some("Ada".to_string()));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let mut reg = SessionRegistry::new();
        let a = reg.connect();
        let slot = TypingSlot::new();
        let mut rx = slot.subscribe();

        slot.start("main", a, "Ada");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().map(|h| h.name.as_str()), Some("Ada"));

        // restarting by the same holder is not a change
        slot.start("main", a, "Ada");
        assert!(!rx.has_changed().unwrap());

        slot.stop("main", a);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
