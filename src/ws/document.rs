use crate::models::delta::{self, Delta};
use crate::models::messages::{DocumentMessage, UpdatePayload};
use crate::store::etag;

use super::error::SyncError;

/// The authoritative text of a room.
///
/// Updates are last-write-wins: a full-text update replaces the content
/// regardless of what the sender last saw.
#[derive(Debug, Clone)]
pub struct Document {
    content: String,
    revision: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Document {
    pub fn new(content: String) -> Self {
        let revision = etag::compute(&content);
        Self { content, revision }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content hash of the current text, same format as file etags
    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn snapshot(&self) -> DocumentMessage {
        DocumentMessage {
            content: self.content.clone(),
            revision: self.revision.clone(),
        }
    }

    /// Apply an update. On error the document is unchanged.
    pub fn apply(&mut self, payload: UpdatePayload) -> Result<(), SyncError> {
        let next = match payload {
            UpdatePayload::Full(content) => content,
            UpdatePayload::Delta { delta, base } => self.apply_delta(&delta, base.as_deref())?,
        };
        self.revision = etag::compute(&next);
        self.content = next;
        Ok(())
    }

    fn apply_delta(&self, delta: &Delta, base: Option<&str>) -> Result<String, SyncError> {
        // Without a base the delta is applied blind and may land on newer text.
        if let Some(base) = base {
            if !etag::matches(base, &self.revision) {
                return Err(SyncError::StaleBase {
                    base: base.to_string(),
                    current: self.revision.clone(),
                });
            }
        }
        Ok(delta::apply(&self.content, delta)?)
    }
}
