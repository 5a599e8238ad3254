use std::collections::BTreeMap;
use std::fmt;

/// Display name of a session that has not set one
pub const DEFAULT_NAME: &str = "Guest";

pub const MAX_NAME_CHARS: usize = 40;

/// Connection-scoped session id. Ids grow with connect order within a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    pub display_name: String,
}

/// Live sessions of one room.
///
/// Presence is a projection of the session map. The typing slot is
/// process-wide and lives in `TypingSlot`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<SessionId, Session>,
    next_id: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self) -> SessionId {
        self.next_id += 1;
        let id = SessionId(self.next_id);
        self.sessions.insert(
            id,
            Session {
                display_name: DEFAULT_NAME.to_string(),
            },
        );
        id
    }

    /// Returns whether the session was present
    pub fn disconnect(&mut self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Set the display name, trimmed and cut to 40 chars. Returns the stored
    /// name, or `None` for an unknown session.
    pub fn set_name(&mut self, id: SessionId, name: &str) -> Option<&str> {
        let session = self.sessions.get_mut(&id)?;
        let trimmed: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
        let trimmed = trimmed.trim_end();
        session.display_name = if trimmed.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        Some(session.display_name.as_str())
    }

    pub fn name(&self, id: SessionId) -> Option<&str> {
        self.sessions.get(&id).map(|s| s.display_name.as_str())
    }

    /// Display names in connect order
    pub fn presence_snapshot(&self) -> Vec<String> {
        self.sessions
            .values()
            .map(|s| s.display_name.clone())
            .collect()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_follows_connect_order() {
        let mut reg = SessionRegistry::new();
        let a = reg.connect();
        let b = reg.connect();
        let c = reg.connect();
        reg.set_name(c, "Cleo");
        reg.set_name(a, "Ada");
        assert_eq!(reg.presence_snapshot(), vec!["Ada", "Guest", "Cleo"]);
        assert_eq!(reg.presence_snapshot(), reg.presence_snapshot());

        reg.disconnect(b);
        assert_eq!(reg.presence_snapshot(), vec!["Ada", "Cleo"]);
    }

    #[test]
    fn names_are_trimmed_truncated_and_defaulted() {
        let mut reg = SessionRegistry::new();
        let id = reg.connect();
        assert_eq!(reg.set_name(id, "  Ada  "), Some("Ada"));
        assert_eq!(reg.set_name(id, "   "), Some(DEFAULT_NAME));
        let long = "é".repeat(60);
        assert_eq!(reg.set_name(id, &long).unwrap().chars().count(), MAX_NAME_CHARS);
        // renaming is allowed
        assert_eq!(reg.set_name(id, "Bea"), Some("Bea"));
    }

    #[test]
    fn unknown_sessions_are_ignored() {
        let mut reg = SessionRegistry::new();
        let id = reg.connect();
        assert!(reg.disconnect(id));
        assert_eq!(reg.set_name(id, "Ghost"), None);
        assert_eq!(reg.name(id), None);
        assert!(!reg.disconnect(id));
        assert!(reg.is_empty());
    }
}
