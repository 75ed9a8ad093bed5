//! File-backed key-value store.
//!
//! Each key is stored as `{dir}/{key}.json`. Every write goes to its own
//! hidden temporary file in the same directory, is fsynced, then renamed over
//! the target, so a reader never observes a half-written value and
//! overlapping writes to one key each land whole.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quip_core::error::{QuipError, Result};
use quip_core::storage::KeyValueStore;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Key-value store persisting one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileKeyValueStore {
    dir: PathBuf,
}

impl JsonFileKeyValueStore {
    const EXTENSION: &'static str = "json";

    /// Creates a store rooted at `dir` (for testing or custom locations).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
    fn validate_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(QuipError::storage(format!("invalid storage key '{}'", key)))
        }
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, Self::EXTENSION)))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.{}.{}.tmp", key, Self::EXTENSION, Uuid::new_v4()))
    }

    async fn write_atomic(tmp_path: &Path, path: &Path, value: &str) -> Result<()> {
        let mut tmp_file = fs::File::create(tmp_path).await?;
        tmp_file.write_all(value.as_bytes()).await?;

        // Ensure data is on disk before the rename makes it visible
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(tmp_path, path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuipError::io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.value_path(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| QuipError::io(format!("Failed to create storage directory: {}", e)))?;

        let tmp_path = self.temp_path(key);
        let result = Self::write_atomic(&tmp_path, &path, &value).await;
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileKeyValueStore::with_dir(temp_dir.path());

        store
            .set("user", r#"{"id":"1"}"#.to_string())
            .await
            .unwrap();

        let loaded = store.get("user").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"id":"1"}"#));
        assert!(temp_dir.path().join("user.json").exists());
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileKeyValueStore::with_dir(temp_dir.path().join("not-created-yet"));

        assert!(store.get("savedJokes").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileKeyValueStore::with_dir(temp_dir.path());

        store.set("savedJokes", "[]".to_string()).await.unwrap();
        store
            .set("savedJokes", r#"[{"id":"a"}]"#.to_string())
            .await
            .unwrap();

        assert_eq!(
            store.get("savedJokes").await.unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );
        assert_eq!(file_names(temp_dir.path()), vec!["savedJokes.json"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_overlapping_writes_to_one_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileKeyValueStore::with_dir(temp_dir.path()));

        let values: Vec<String> = (0..64).map(|i| format!("[{i}]")).collect();
        let tasks: Vec<_> = values
            .iter()
            .cloned()
            .map(|value| {
                let store = store.clone();
                tokio::spawn(async move { store.set("savedJokes", value).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = store.get("savedJokes").await.unwrap().unwrap();
        assert!(values.contains(&stored), "unexpected value {stored}");
        assert_eq!(file_names(temp_dir.path()), vec!["savedJokes.json"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileKeyValueStore::with_dir(temp_dir.path());

        store.set("user", "{}".to_string()).await.unwrap();
        store.delete("user").await.unwrap();
        store.delete("user").await.unwrap();

        assert!(store.get("user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileKeyValueStore::with_dir(temp_dir.path());

        let err = store.set("../escape", "x".to_string()).await.unwrap_err();
        assert!(err.is_storage());
        assert!(store.get("").await.is_err());
    }
}
