//! File-backed document store
//!
//! One file per document: `<root>/<id>.<ext>`. Content is always written to
//! a temp file in the same directory first; `create` hard-links it into
//! place and `update` renames it over the old file, so readers never see a
//! partial document.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, Weak};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    check_precondition, etag, naming, Created, DocumentStore, StoreError, StoredEntry, StoredFile,
};

/// Per-id write locks. An entry stays reachable for as long as anyone holds
/// its lock; dead entries are pruned when a new id is added.
#[derive(Debug, Default)]
struct WriteLocks {
    table: std::sync::Mutex<HashMap<String, Weak<Mutex<()>>>>,
}

impl WriteLocks {
    fn get(&self, id: &str) -> Arc<Mutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = table.get(id).and_then(Weak::upgrade) {
            return lock;
        }
        table.retain(|_, lock| lock.strong_count() > 0);
        let lock = Arc::new(Mutex::new(()));
        table.insert(id.to_string(), Arc::downgrade(&lock));
        lock
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

pub struct FsDocumentStore {
    root: PathBuf,
    ext: String,
    write_locks: WriteLocks,
}

impl FsDocumentStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn open(
        root: impl Into<PathBuf>,
        ext: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!(path = %root.display(), "Document store initialized");
        Ok(Self {
            root,
            ext: ext.into(),
            write_locks: WriteLocks::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        naming::resolve(&self.root, id, &self.ext)
    }

    async fn read_existing(&self, id: &str, path: &Path) -> Result<String, StoreError> {
        fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(id.to_string())
            } else {
                StoreError::Io(e.to_string())
            }
        })
    }

    /// Write and fsync `content` into a fresh temp file next to the documents.
    async fn write_temp(&self, id: &str, content: &str) -> Result<PathBuf, StoreError> {
        let temp_path = self.root.join(format!(".{}.{}.tmp", id, Uuid::new_v4()));

        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            discard(&temp_path).await;
            return Err(e.into());
        }
        Ok(temp_path)
    }
}

async fn discard(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %temp_path.display(), "Failed to remove temp file: {}", e);
        }
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<StoredEntry>, StoreError> {
        let suffix = format!(".{}", self.ext);
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(&suffix)) else {
                continue;
            };
            // Temp files and anything we could not have written are skipped
            if naming::sanitize(stem).is_err() {
                continue;
            }
            files.push(StoredEntry {
                name: stem.to_string(),
                id: stem.to_string(),
            });
        }

        debug!(count = files.len(), "Listed documents");
        Ok(files)
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn create(&self, name: &str, content: &str) -> Result<Created, StoreError> {
        let id = naming::sanitize(name)?;
        let path = self.path_for(&id)?;

        let lock = self.write_locks.get(&id);
        let _guard = lock.lock().await;

        // Linking fails atomically if the id is taken
        let temp_path = self.write_temp(&id, content).await?;
        let linked = fs::hard_link(&temp_path, &path).await;
        discard(&temp_path).await;
        linked.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                StoreError::AlreadyExists(id.clone())
            } else {
                StoreError::Io(e.to_string())
            }
        })?;

        let etag = etag::compute(content);
        info!(id = %id, etag = %etag, "Created document");
        Ok(Created { id, etag })
    }

    #[instrument(skip(self))]
    async fn read(&self, id: &str) -> Result<StoredFile, StoreError> {
        let path = self.path_for(id)?;
        let content = self.read_existing(id, &path).await?;
        let etag = etag::compute(&content);
        Ok(StoredFile {
            id: id.to_string(),
            content,
            etag,
        })
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn update(
        &self,
        id: &str,
        content: &str,
        expected_etag: Option<&str>,
    ) -> Result<StoredFile, StoreError> {
        let path = self.path_for(id)?;

        let lock = self.write_locks.get(id);
        let _guard = lock.lock().await;

        let current = self.read_existing(id, &path).await?;
        check_precondition(id, expected_etag, &etag::compute(&current))?;

        let temp_path = self.write_temp(id, content).await?;
        if let Err(e) = fs::rename(&temp_path, &path).await {
            discard(&temp_path).await;
            return Err(e.into());
        }

        let etag = etag::compute(content);
        info!(id = %id, etag = %etag, "Updated document");
        Ok(StoredFile {
            id: id.to_string(),
            content: content.to_string(),
            etag,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;

        let lock = self.write_locks.get(id);
        let _guard = lock.lock().await;

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(id = %id, "Deleted document");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Conditional;
    use tempfile::TempDir;

    async fn store() -> (TempDir, FsDocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = FsDocumentStore::open(dir.path(), "txt").await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn create_then_read() {
        let (dir, store) = store().await;
        let created = store.create("notes", "hello").await.unwrap();
        assert_eq!(created.id, "notes");
        assert_eq!(created.etag, etag::compute("hello"));
        assert!(dir.path().join("notes.txt").exists());

        let file = store.read("notes").await.unwrap();
        assert_eq!(file.content, "hello");
        assert_eq!(file.etag, created.etag);
    }

    #[tokio::test]
    async fn second_create_is_rejected_and_leaves_content() {
        let (_dir, store) = store().await;
        store.create("notes", "x").await.unwrap();
        let err = store.create("notes", "y").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(store.read("notes").await.unwrap().content, "x");
    }

    #[tokio::test]
    async fn invalid_names_never_reach_the_disk() {
        let (dir, store) = store().await;
        for bad in ["../escape", "a/b", "dot.ted", ""] {
            assert!(matches!(
                store.create(bad, "x").await,
                Err(StoreError::InvalidName(_))
            ));
            assert!(matches!(store.read(bad).await, Err(StoreError::InvalidName(_))));
            assert!(matches!(
                store.update(bad, "x", None).await,
                Err(StoreError::InvalidName(_))
            ));
        }
        let mut entries = std::fs::read_dir(dir.path()).unwrap();
        assert!(entries.next().is_none());
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.read("ghost").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update("ghost", "x", None).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn conditional_read() {
        let (_dir, store) = store().await;
        let created = store.create("notes", "v1").await.unwrap();

        let unchanged = store.read_if_changed("notes", &created.etag).await.unwrap();
        assert_eq!(
            unchanged,
            Conditional::NotModified {
                etag: created.etag.clone()
            }
        );

        store.update("notes", "v2", None).await.unwrap();
        match store.read_if_changed("notes", &created.etag).await.unwrap() {
            Conditional::Modified(file) => {
                assert_eq!(file.content, "v2");
                assert_ne!(file.etag, created.etag);
            }
            other => panic!("expected new content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let (_dir, store) = store().await;
        let created = store.create("notes", "v1").await.unwrap();
        let updated = store
            .update("notes", "v2", Some(&created.etag))
            .await
            .unwrap();
        assert_eq!(updated.etag, etag::compute("v2"));

        let err = store
            .update("notes", "v3", Some(&created.etag))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed { .. }));
        assert_eq!(store.read("notes").await.unwrap().content, "v2");
    }

    #[tokio::test]
    async fn concurrent_updates_with_same_etag_have_one_winner() {
        let (_dir, store) = store().await;
        let store = Arc::new(store);
        let created = store.create("notes", "base").await.unwrap();

        let a = {
            let store = store.clone();
            let etag = created.etag.clone();
            tokio::spawn(async move { store.update("notes", "from a", Some(&etag)).await })
        };
        let b = {
            let store = store.clone();
            let etag = created.etag.clone();
            tokio::spawn(async move { store.update("notes", "from b", Some(&etag)).await })
        };
        let results = [a.await.unwrap(), b.await.unwrap()];

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert_ne!(winners[0].etag, created.etag);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::PreconditionFailed { .. }))));
        assert_eq!(store.read("notes").await.unwrap().content, winners[0].content);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = store().await;
        store.create("notes", "x").await.unwrap();
        store.delete("notes").await.unwrap();
        store.delete("notes").await.unwrap();
        assert!(matches!(
            store.read("notes").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_skips_foreign_and_temp_files() {
        let (dir, store) = store().await;
        store.create("alpha", "a").await.unwrap();
        store.create("beta", "b").await.unwrap();
        std::fs::write(dir.path().join(".alpha.1234.tmp"), "partial").unwrap();
        std::fs::write(dir.path().join("readme.md"), "other").unwrap();
        std::fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let mut names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| {
                assert_eq!(e.name, e.id);
                e.name
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn create_leaves_only_the_document() {
        let (dir, store) = store().await;
        store.create("notes", "v1").await.unwrap();
        assert!(store.create("notes", "v2").await.is_err());
        assert_eq!(file_names(dir.path()), vec!["notes.txt"]);
        assert_eq!(store.read("notes").await.unwrap().content, "v1");
    }

    #[tokio::test]
    async fn concurrent_creates_have_one_winner() {
        let (_dir, store) = store().await;
        let store = Arc::new(store);
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create("notes", &format!("v{i}")).await })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(matches!(e, StoreError::AlreadyExists(_))),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn held_write_lock_survives_many_other_ids() {
        let locks = WriteLocks::default();
        let held = locks.get("notes");
        let guard = held.lock().await;

        for i in 0..20_000 {
            drop(locks.get(&format!("id{i}")));
        }
        let again = locks.get("notes");
        assert!(Arc::ptr_eq(&held, &again));
        assert!(again.try_lock().is_err());

        drop(guard);
        drop(held);
        drop(again);
        let _other = locks.get("other");
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn update_leaves_no_temp_files() {
        let (dir, store) = store().await;
        store.create("notes", "v1").await.unwrap();
        store.update("notes", "v2", None).await.unwrap();
        assert_eq!(file_names(dir.path()), vec!["notes.txt"]);
    }
}
