//! Named-document persistence with content-derived etags.
//!
//! The store is independent of the live collaborative document: saving
//! snapshots it, loading never replaces it.

pub mod error;
pub mod etag;
pub mod fs;
pub mod memory;
pub mod naming;

pub use error::StoreError;
pub use fs::FsDocumentStore;
pub use memory::MemoryDocumentStore;

use async_trait::async_trait;

/// Listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub name: String,
    pub id: String,
}

/// Content of a stored document together with its current etag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    pub content: String,
    pub etag: String,
}

/// Result of `create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    pub etag: String,
}

/// Outcome of a conditional read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional<T> {
    Modified(T),
    NotModified { etag: String },
}

/// Persistence backend for named documents.
///
/// Every method validates ids before touching storage. Etags are
/// `etag::compute` of the stored content.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All stored documents, in backend order
    async fn list(&self) -> Result<Vec<StoredEntry>, StoreError>;

    /// Persist a new document. Fails with `AlreadyExists` if the id is taken;
    /// the check is made by the write itself.
    async fn create(&self, name: &str, content: &str) -> Result<Created, StoreError>;

    async fn read(&self, id: &str) -> Result<StoredFile, StoreError>;

    /// Replace the content of an existing document. When `expected_etag` is
    /// given it must still match the stored content, compared strongly.
    async fn update(
        &self,
        id: &str,
        content: &str,
        expected_etag: Option<&str>,
    ) -> Result<StoredFile, StoreError>;

    /// Remove a document. Removing an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Read unless the caller's `known_etag` still names the stored content.
    async fn read_if_changed(
        &self,
        id: &str,
        known_etag: &str,
    ) -> Result<Conditional<StoredFile>, StoreError> {
        let file = self.read(id).await?;
        if etag::matches(known_etag, &file.etag) {
            Ok(Conditional::NotModified { etag: file.etag })
        } else {
            Ok(Conditional::Modified(file))
        }
    }
}

/// Shared precondition check for `update` implementations
pub(crate) fn check_precondition(
    id: &str,
    expected: Option<&str>,
    current: &str,
) -> Result<(), StoreError> {
    match expected {
        Some(expected) if !etag::matches_strong(expected, current) => {
            Err(StoreError::PreconditionFailed {
                id: id.to_string(),
                expected: expected.to_string(),
                current: current.to_string(),
            })
        }
        _ => Ok(()),
    }
}
