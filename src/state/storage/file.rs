//! JSON file state storage
//!
//! Keeps every record in memory and rewrites the whole file after each
//! mutation. Suited to small bots that need states to survive restarts
//! without running Redis.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use crate::state::key::{ContextKey, KeyBuilder};
use crate::utils::errors::Result;
use super::{RecordMap, StateData, StateStorage};

/// State storage persisted to a JSON file
#[derive(Debug)]
pub struct FileStorage {
    keys: KeyBuilder,
    path: PathBuf,
    records: Mutex<RecordMap>,
}

impl FileStorage {
    /// Open the storage file, starting empty if it does not exist yet
    pub async fn open(path: impl AsRef<Path>, keys: KeyBuilder) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => RecordMap::default(),
            Ok(contents) => match serde_json::from_str::<RecordMap>(&contents) {
                Ok(records) => records,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to parse state file");
                    return Err(e.into());
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RecordMap::default(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), contexts = records.len(), "Opened file state storage");

        Ok(Self {
            keys,
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the records through a temporary file so a crash never leaves a
    /// truncated store behind
    async fn persist(&self, records: &RecordMap) -> Result<()> {
        let serialized = serde_json::to_string_pretty(records)?;
        let tmp_path = self.path.with_extension("tmp");

        tokio::fs::write(&tmp_path, serialized).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), contexts = records.len(), "State file written");
        Ok(())
    }

    /// Apply `mutate` to a copy of the records and swap the copy in only once
    /// it is on disk. The closure returns the outcome and whether anything
    /// changed; unchanged copies are neither written nor swapped.
    async fn write_with<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut RecordMap) -> Result<(T, bool)>,
    {
        let mut records = self.records.lock().await;
        let mut staged = records.clone();
        let (outcome, changed) = mutate(&mut staged)?;

        if changed {
            if let Err(e) = self.persist(&staged).await {
                error!(path = %self.path.display(), error = %e, "Failed to write state file");
                return Err(e);
            }
            *records = staged;
        }
        Ok(outcome)
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn set_state(&self, key: &ContextKey, state: &str) -> Result<bool> {
        let key = self.keys.build(key);
        self.write_with(|records| {
            records.set_state(key, state);
            Ok((true, true))
        })
        .await
    }

    async fn get_state(&self, key: &ContextKey) -> Result<Option<String>> {
        Ok(self.records.lock().await.get_state(&self.keys.build(key)))
    }

    async fn delete_state(&self, key: &ContextKey) -> Result<bool> {
        let key = self.keys.build(key);
        self.write_with(|records| {
            let deleted = records.delete(&key);
            Ok((deleted, deleted))
        })
        .await
    }

    async fn set_data(&self, key: &ContextKey, field: &str, value: Value) -> Result<()> {
        let key = self.keys.build(key);
        self.write_with(|records| {
            records.set_data(&key, field, value)?;
            Ok(((), true))
        })
        .await
    }

    async fn get_data(&self, key: &ContextKey) -> Result<StateData> {
        Ok(self.records.lock().await.get_data(&self.keys.build(key)))
    }

    async fn reset_data(&self, key: &ContextKey) -> Result<bool> {
        let key = self.keys.build(key);
        self.write_with(|records| {
            let reset = records.reset_data(&key);
            Ok((reset, reset))
        })
        .await
    }

    async fn save_data(&self, key: &ContextKey, data: StateData) -> Result<()> {
        let key = self.keys.build(key);
        self.write_with(|records| {
            records.save_data(&key, data)?;
            Ok(((), true))
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use crate::utils::errors::StateError;

    #[tokio::test]
    async fn test_states_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.json");
        let key = ContextKey::new(10, 20, 30).with_business_connection("biz");

        {
            let storage = FileStorage::open(&path, KeyBuilder::default()).await.unwrap();
            storage.set_state(&key, "Order:address").await.unwrap();
            storage.set_data(&key, "street", json!("Main st")).await.unwrap();
        }

        let reopened = FileStorage::open(&path, KeyBuilder::default()).await.unwrap();
        assert_eq!(reopened.get_state(&key).await.unwrap(), Some("Order:address".to_string()));
        assert_eq!(reopened.get_data(&key).await.unwrap().get("street"), Some(&json!("Main st")));
        assert!(!dir.path().join("states.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("absent.json"), KeyBuilder::default())
            .await
            .unwrap();

        let key = ContextKey::new(1, 1, 1);
        assert_eq!(storage.get_state(&key).await.unwrap(), None);
        assert!(!storage.delete_state(&key).await.unwrap());
        // Nothing was mutated, so nothing was written
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.json");
        std::fs::write(&path, "{not json").unwrap();

        assert_matches!(
            FileStorage::open(&path, KeyBuilder::default()).await,
            Err(StateError::Serialization(_))
        );
    }

    #[tokio::test]
    async fn test_delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.json");
        let key = ContextKey::new(1, 2, 3);

        let storage = FileStorage::open(&path, KeyBuilder::default()).await.unwrap();
        storage.set_state(&key, "s").await.unwrap();
        assert!(storage.delete_state(&key).await.unwrap());
        drop(storage);

        let reopened = FileStorage::open(&path, KeyBuilder::default()).await.unwrap();
        assert_eq!(reopened.get_state(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_records_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("missing-dir").join("states.json"), KeyBuilder::default())
            .await
            .unwrap();
        let key = ContextKey::new(1, 2, 3);

        assert!(storage.set_state(&key, "Form:name").await.is_err());
        assert_eq!(storage.get_state(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("state");
        std::fs::create_dir(&state_dir).unwrap();
        let key = ContextKey::new(1, 2, 3);

        let storage = FileStorage::open(state_dir.join("states.json"), KeyBuilder::default())
            .await
            .unwrap();
        storage.set_state(&key, "Form:name").await.unwrap();
        storage.set_data(&key, "name", json!("Ann")).await.unwrap();

        std::fs::remove_dir_all(&state_dir).unwrap();

        assert!(storage.set_state(&key, "Form:age").await.is_err());
        assert!(storage.set_data(&key, "age", json!(31)).await.is_err());
        assert!(storage.save_data(&key, StateData::new()).await.is_err());
        assert!(storage.reset_data(&key).await.is_err());
        assert!(storage.delete_state(&key).await.is_err());

        assert_eq!(storage.get_state(&key).await.unwrap(), Some("Form:name".to_string()));
        let data = storage.get_data(&key).await.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["name"], json!("Ann"));
    }
}
