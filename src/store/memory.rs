//! In-memory document store, for tests and for deployments that do not
//! need durability.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    check_precondition, etag, naming, Created, DocumentStore, StoreError, StoredEntry, StoredFile,
};

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    files: RwLock<BTreeMap<String, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self) -> Result<Vec<StoredEntry>, StoreError> {
        let files = self.files.read().await;
        Ok(files
            .keys()
            .map(|id| StoredEntry {
                name: id.clone(),
                id: id.clone(),
            })
            .collect())
    }

    async fn create(&self, name: &str, content: &str) -> Result<Created, StoreError> {
        let id = naming::sanitize(name)?;
        let mut files = self.files.write().await;
        if files.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        files.insert(id.clone(), content.to_string());
        debug!(id = %id, "Created in-memory document");
        Ok(Created {
            id,
            etag: etag::compute(content),
        })
    }

    async fn read(&self, id: &str) -> Result<StoredFile, StoreError> {
        let id = naming::sanitize(id)?;
        let files = self.files.read().await;
        let content = files
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(StoredFile {
            etag: etag::compute(&content),
            id,
            content,
        })
    }

    async fn update(
        &self,
        id: &str,
        content: &str,
        expected_etag: Option<&str>,
    ) -> Result<StoredFile, StoreError> {
        let id = naming::sanitize(id)?;
        let mut files = self.files.write().await;
        let current = files
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        check_precondition(&id, expected_etag, &etag::compute(current))?;
        *current = content.to_string();
        Ok(StoredFile {
            id,
            content: content.to_string(),
            etag: etag::compute(content),
        })
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = naming::sanitize(id)?;
        self.files.write().await.remove(&id);
        Ok(())
    }
}
