//! State storage engines
//!
//! A storage engine keeps one record per context key: the state label and a
//! JSON data map. Data only exists alongside a label, so writing data for a
//! context with no state set is an error, while reading it yields an empty map.

pub mod file;
pub mod memory;
pub mod redis;

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use crate::config::{StorageBackend, StorageConfig};
use crate::utils::errors::{StateError, Result};
use super::key::{ContextKey, KeyBuilder};

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use self::redis::RedisStorage;

/// Data attached to a state
pub type StateData = serde_json::Map<String, Value>;

/// Storage engine interface
#[async_trait]
pub trait StateStorage: Send + Sync + std::fmt::Debug {
    /// Set the state label, creating the record with empty data if needed
    async fn set_state(&self, key: &ContextKey, state: &str) -> Result<bool>;

    async fn get_state(&self, key: &ContextKey) -> Result<Option<String>>;

    /// Remove the label and its data. Returns `false` if nothing was stored.
    async fn delete_state(&self, key: &ContextKey) -> Result<bool>;

    /// Set one data field. Fails with [`StateError::StateNotSet`] when no state is set.
    async fn set_data(&self, key: &ContextKey, field: &str, value: Value) -> Result<()>;

    /// Snapshot of the data; empty when no state is set
    async fn get_data(&self, key: &ContextKey) -> Result<StateData>;

    /// Clear the data and keep the label. Returns `false` if no state is set.
    async fn reset_data(&self, key: &ContextKey) -> Result<bool>;

    /// Replace the whole data map. Fails with [`StateError::StateNotSet`] when no state is set.
    async fn save_data(&self, key: &ContextKey, data: StateData) -> Result<()>;

    /// Engine name for logs
    fn backend(&self) -> &'static str;
}

/// Stored state record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub state: String,
    #[serde(default)]
    pub data: StateData,
    pub updated_at: DateTime<Utc>,
}

impl StateRecord {
    pub fn new(state: &str) -> Self {
        Self {
            state: state.to_string(),
            data: StateData::new(),
            updated_at: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Record map shared by the in-process engines
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct RecordMap {
    records: HashMap<String, StateRecord>,
}

impl RecordMap {
    pub(crate) fn set_state(&mut self, key: String, state: &str) {
        match self.records.get_mut(&key) {
            Some(record) => {
                record.state = state.to_string();
                record.touch();
            }
            None => {
                self.records.insert(key, StateRecord::new(state));
            }
        }
    }

    pub(crate) fn get_state(&self, key: &str) -> Option<String> {
        self.records.get(key).map(|record| record.state.clone())
    }

    pub(crate) fn delete(&mut self, key: &str) -> bool {
        self.records.remove(key).is_some()
    }

    pub(crate) fn set_data(&mut self, key: &str, field: &str, value: Value) -> Result<()> {
        let record = self.record_mut(key)?;
        record.data.insert(field.to_string(), value);
        record.touch();
        Ok(())
    }

    pub(crate) fn get_data(&self, key: &str) -> StateData {
        self.records.get(key).map(|record| record.data.clone()).unwrap_or_default()
    }

    pub(crate) fn reset_data(&mut self, key: &str) -> bool {
        match self.records.get_mut(key) {
            Some(record) => {
                record.data.clear();
                record.touch();
                true
            }
            None => false,
        }
    }

    pub(crate) fn save_data(&mut self, key: &str, data: StateData) -> Result<()> {
        let record = self.record_mut(key)?;
        record.data = data;
        record.touch();
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    fn record_mut(&mut self, key: &str) -> Result<&mut StateRecord> {
        self.records
            .get_mut(key)
            .ok_or_else(|| StateError::StateNotSet { key: key.to_string() })
    }
}

/// Open the storage engine selected in configuration
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn StateStorage>> {
    let keys = KeyBuilder::new(config.prefix.clone(), config.separator.clone());

    let storage: Arc<dyn StateStorage> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new(keys)),
        StorageBackend::File => Arc::new(FileStorage::open(&config.file_path, keys).await?),
        StorageBackend::Redis => Arc::new(RedisStorage::new(&config.redis, keys).await?),
    };

    info!(backend = storage.backend(), prefix = %config.prefix, "State storage opened");
    Ok(storage)
}
