//! Implements KeyValuePort using a single JSON file.
//!
//! All keys live in one JSON object on disk; an in-memory cache serves reads.

use crate::domain::DomainError;
use crate::ports::KeyValuePort;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// JSON file-based key-value storage.
pub struct JsonFileStorage {
    path: PathBuf,
    cache: tokio::sync::RwLock<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Open storage at `path`, loading whatever is already there.
    /// A missing file is an empty store; an unreadable one is logged and treated as empty.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }
        let data: BTreeMap<String, String> = match fs::read_to_string(&path).await {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "storage file is not a JSON object; starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "storage file unreadable; starting empty, next write replaces it");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = data.len(), "storage opened");
        Ok(Self {
            path,
            cache: tokio::sync::RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write-replace: temp file, sync_all, rename. A crash mid-write leaves the old file intact.
    async fn flush(&self, data: &BTreeMap<String, String>) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(data).map_err(|e| DomainError::Storage(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Storage(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Storage(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Storage(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Storage(format!("atomic rename failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValuePort for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let cache = self.cache.read().await;
        Ok(cache.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        // Hold the write guard through the flush so concurrent writers land in order.
        let mut cache = self.cache.write().await;
        cache.insert(key.to_string(), value.to_string());
        self.flush(&cache).await
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut cache = self.cache.write().await;
        if cache.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&cache).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(store.get("careflow_auth").await.unwrap(), None);
        store.set("careflow_auth", "true").await.unwrap();
        store.set("careflow_state", "{}").await.unwrap();
        drop(store);

        let reopened = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get("careflow_auth").await.unwrap().as_deref(), Some("true"));
        assert_eq!(reopened.get("careflow_state").await.unwrap().as_deref(), Some("{}"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = JsonFileStorage::open(&path).await.unwrap();
        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("never-set").await.unwrap();
        drop(store);

        let reopened = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(store.get("careflow_state").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_utf8_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let store = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(store.get("careflow_state").await.unwrap(), None);
        assert_eq!(store.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_creates_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("storage.json");

        let store = JsonFileStorage::open(&path).await.unwrap();
        store.set("k", "v").await.unwrap();
        assert!(path.exists());
    }
}
