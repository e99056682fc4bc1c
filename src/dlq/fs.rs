//! Filesystem blob store.
//!
//! Keys map to files under a root directory (`/` separators become
//! subdirectories). Suitable for single-node edge deployments and local
//! development; an object-storage backend slots in behind the same trait.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use super::{BlobError, BlobStore};

/// Blob store backed by the local filesystem.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, BlobError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| BlobError::Backend(format!("create {}: {}", root.display(), e)))?;
        info!(root = %root.display(), "filesystem blob store ready");
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in key.split('/') {
            path.push(part);
        }
        path
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Backend(format!("create {}: {}", parent.display(), e)))?;
        }
        fs::write(&path, bytes)
            .await
            .map_err(|e| BlobError::Backend(format!("write {}: {}", path.display(), e)))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlobError::NotFound(key.to_string()))
            }
            Err(e) => Err(BlobError::Backend(format!("read {}: {}", path.display(), e))),
        }
    }

    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<String>, BlobError> {
        let dir = self.path_for(prefix);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // No records ever written under this prefix.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(BlobError::Backend(format!(
                    "list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BlobError::Backend(format!("list {}: {}", dir.display(), e)))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(format!("{}/{}", prefix.trim_end_matches('/'), name));
            }
        }

        // read_dir order is platform-dependent; sort to restore the
        // chronological key order.
        names.sort();
        names.truncate(limit);
        Ok(names)
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Idempotent: already gone is success.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Backend(format!(
                "delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, FsBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let (_dir, store) = store().await;
        store.put("dlq/1700000000000-aabbccdd", b"payload").await.unwrap();
        let bytes = store.get("dlq/1700000000000-aabbccdd").await.unwrap();
        assert_eq!(bytes, b"payload");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.get("dlq/nothing").await,
            Err(BlobError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_sorted_and_capped() {
        let (_dir, store) = store().await;
        for name in ["3-c", "1-a", "2-b"] {
            store.put(&format!("dlq/{}", name), b"").await.unwrap();
        }
        let keys = store.list("dlq", 10).await.unwrap();
        assert_eq!(keys, vec!["dlq/1-a", "dlq/2-b", "dlq/3-c"]);

        let keys = store.list("dlq", 1).await.unwrap();
        assert_eq!(keys, vec!["dlq/1-a"]);
    }

    #[tokio::test]
    async fn test_list_empty_prefix_is_empty() {
        let (_dir, store) = store().await;
        assert!(store.list("never-written", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        let (_dir, store) = store().await;
        store.put("dlq/1-a", b"x").await.unwrap();
        store.delete("dlq/1-a").await.unwrap();
        store.delete("dlq/1-a").await.unwrap();
    }
}
