use serde::{Deserialize, Serialize};
use crate::models::delta::Delta;
use crate::ws::SyncError;

/// Update from a client: either the full text or a delta.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
    /// Revision tag the delta was computed against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// Validated form of an `UpdateMessage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePayload {
    Full(String),
    Delta { delta: Delta, base: Option<String> },
}

impl UpdateMessage {
    pub fn into_payload(self) -> Result<UpdatePayload, SyncError> {
        match (self.content, self.delta) {
            (Some(content), None) => Ok(UpdatePayload::Full(content)),
            (None, Some(delta)) => Ok(UpdatePayload::Delta {
                delta,
                base: self.base,
            }),
            (Some(_), Some(_)) => Err(SyncError::MalformedMessage(
                "update carries both content and delta".to_string(),
            )),
            (None, None) => Err(SyncError::MalformedMessage(
                "update carries neither content nor delta".to_string(),
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetNameMessage {
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoadMessage {
    pub id: String,
    #[serde(default)]
    pub etag: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SaveNewMessage {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessage {
    pub id: String,
    #[serde(default)]
    pub etag: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ReceivedMessage {
    #[serde(rename = "update")]
    Update(UpdateMessage),
    #[serde(rename = "setName")]
    SetName(SetNameMessage),
    #[serde(rename = "startTyping")]
    StartTyping,
    #[serde(rename = "stopTyping")]
    StopTyping,
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "load")]
    Load(LoadMessage),
    #[serde(rename = "saveNew")]
    SaveNew(SaveNewMessage),
    #[serde(rename = "save")]
    Save(SaveMessage),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMessage {
    pub content: String,
    pub revision: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsersMessage {
    pub users: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypingMessage {
    pub user: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMessage {
    pub id: String,
    pub name: String,
    pub content: String,
    pub etag: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileUnchangedMessage {
    pub id: String,
    pub etag: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedMessage {
    pub id: String,
    pub name: String,
    pub etag: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileErrorMessage {
    pub op: String,
    pub code: String,
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SendMessage {
    #[serde(rename = "init")]
    Init(DocumentMessage),
    #[serde(rename = "update")]
    Update(DocumentMessage),
    #[serde(rename = "resync")]
    Resync(DocumentMessage),
    #[serde(rename = "users")]
    Users(UsersMessage),
    #[serde(rename = "typing")]
    Typing(TypingMessage),
    #[serde(rename = "pong")]
    Pong(PongMessage),
    #[serde(rename = "file")]
    File(FileMessage),
    #[serde(rename = "fileUnchanged")]
    FileUnchanged(FileUnchangedMessage),
    #[serde(rename = "saved")]
    Saved(SavedMessage),
    #[serde(rename = "fileError")]
    FileError(FileErrorMessage),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_client_events() {
        let msg: ReceivedMessage =
            serde_json::from_str(r#"{"type":"update","content":"hello"}"#).unwrap();
        match msg {
            ReceivedMessage::Update(update) => {
                assert_eq!(update.into_payload().unwrap(), UpdatePayload::Full("hello".into()))
            }
            other => panic!("unexpected {other:?}"),
        }

        let msg: ReceivedMessage = serde_json::from_str(
            r#"{"type":"update","delta":{"kind":"insert","position":2,"text":"x"},"base":"\"r\""}"#,
        )
        .unwrap();
        let ReceivedMessage::Update(update) = msg else {
            panic!("expected update")
        };
        assert_eq!(
            update.into_payload().unwrap(),
            UpdatePayload::Delta {
                delta: Delta::Insert {
                    position: 2,
                    text: "x".into()
                },
                base: Some("\"r\"".into()),
            }
        );

        assert!(matches!(
            serde_json::from_str::<ReceivedMessage>(r#"{"type":"startTyping"}"#).unwrap(),
            ReceivedMessage::StartTyping
        ));
        assert!(matches!(
            serde_json::from_str::<ReceivedMessage>(r#"{"type":"setName","name":"Ada"}"#).unwrap(),
            ReceivedMessage::SetName(SetNameMessage { ref name }) if name == "Ada"
        ));
    }

    #[test]
    fn rejects_ambiguous_updates() {
        let both = UpdateMessage {
            content: Some("x".into()),
            delta: Some(Delta::Delete {
                position: 0,
                length: 1,
            }),
            base: None,
        };
        assert!(matches!(
            both.into_payload(),
            Err(SyncError::MalformedMessage(_))
        ));
        assert!(UpdateMessage::default().into_payload().is_err());
        assert!(serde_json::from_str::<ReceivedMessage>(r#"{"type":"shout"}"#).is_err());
    }

    #[test]
    fn server_events_are_tagged() {
        let typing =
            serde_json::to_value(SendMessage::Typing(TypingMessage { user: None })).unwrap();
        assert_eq!(typing, json!({"type": "typing", "user": null}));

        let users = serde_json::to_value(SendMessage::Users(UsersMessage {
            users: vec!["Ada".into(), "Guest".into()],
        }))
        .unwrap();
        assert_eq!(users, json!({"type": "users", "users": ["Ada", "Guest"]}));
    }
}
