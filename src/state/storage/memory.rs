//! In-process state storage

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use crate::state::key::{ContextKey, KeyBuilder};
use crate::utils::errors::Result;
use super::{RecordMap, StateData, StateStorage};

/// State storage kept in memory; lost on restart
#[derive(Debug, Default)]
pub struct MemoryStorage {
    keys: KeyBuilder,
    records: RwLock<RecordMap>,
}

impl MemoryStorage {
    pub fn new(keys: KeyBuilder) -> Self {
        Self {
            keys,
            records: RwLock::new(RecordMap::default()),
        }
    }

    /// Number of contexts with a state set
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn set_state(&self, key: &ContextKey, state: &str) -> Result<bool> {
        let key = self.keys.build(key);
        debug!(key = %key, state = state, "Setting state in memory");
        self.records.write().await.set_state(key, state);
        Ok(true)
    }

    async fn get_state(&self, key: &ContextKey) -> Result<Option<String>> {
        Ok(self.records.read().await.get_state(&self.keys.build(key)))
    }

    async fn delete_state(&self, key: &ContextKey) -> Result<bool> {
        Ok(self.records.write().await.delete(&self.keys.build(key)))
    }

    async fn set_data(&self, key: &ContextKey, field: &str, value: Value) -> Result<()> {
        self.records.write().await.set_data(&self.keys.build(key), field, value)
    }

    async fn get_data(&self, key: &ContextKey) -> Result<StateData> {
        Ok(self.records.read().await.get_data(&self.keys.build(key)))
    }

    async fn reset_data(&self, key: &ContextKey) -> Result<bool> {
        Ok(self.records.write().await.reset_data(&self.keys.build(key)))
    }

    async fn save_data(&self, key: &ContextKey, data: StateData) -> Result<()> {
        self.records.write().await.save_data(&self.keys.build(key), data)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
