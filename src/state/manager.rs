//! Bot-level state operations
//!
//! [`StateManager`] owns the storage engine and the bot id. Handlers normally
//! reach it through a [`StateContext`](super::StateContext), which resolves the
//! context tuple from the incoming event; code that already knows the ids can
//! call it directly.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use serde_json::Value;
use tracing::debug;
use crate::utils::errors::Result;
use crate::utils::logging::{log_data_update, log_state_transition};
use super::key::ContextKey;
use super::storage::{StateData, StateStorage};

/// State operations for one bot
#[derive(Debug, Clone)]
pub struct StateManager {
    storage: Arc<dyn StateStorage>,
    bot_id: i64,
}

impl StateManager {
    pub fn new(storage: Arc<dyn StateStorage>, bot_id: i64) -> Self {
        Self { storage, bot_id }
    }

    pub fn bot_id(&self) -> i64 {
        self.bot_id
    }

    pub fn storage(&self) -> &Arc<dyn StateStorage> {
        &self.storage
    }

    /// Context tuple for a chat/user pair of this bot
    pub fn key(&self, chat_id: i64, user_id: i64) -> ContextKey {
        ContextKey::new(chat_id, user_id, self.bot_id)
    }

    /// Set the state label for a context
    pub async fn set_state(&self, key: &ContextKey, state: impl AsRef<str>) -> Result<bool> {
        let state = state.as_ref();
        let updated = self.storage.set_state(key, state).await?;
        log_state_transition(key, Some(state));
        Ok(updated)
    }

    pub async fn get_state(&self, key: &ContextKey) -> Result<Option<String>> {
        let state = self.storage.get_state(key).await?;
        debug!(chat_id = key.chat_id, user_id = key.user_id, state = ?state, "State fetched");
        Ok(state)
    }

    /// Delete the state and its data
    pub async fn delete_state(&self, key: &ContextKey) -> Result<bool> {
        let deleted = self.storage.delete_state(key).await?;
        if deleted {
            log_state_transition(key, None);
        }
        Ok(deleted)
    }

    /// Clear the data, keeping the state
    pub async fn reset_data(&self, key: &ContextKey) -> Result<bool> {
        let reset = self.storage.reset_data(key).await?;
        debug!(chat_id = key.chat_id, user_id = key.user_id, reset = reset, "State data reset");
        Ok(reset)
    }

    /// Load the data for in-place editing; see [`StateDataGuard`]
    pub async fn retrieve_data(&self, key: &ContextKey) -> Result<StateDataGuard> {
        let data = self.storage.get_data(key).await?;
        Ok(StateDataGuard {
            storage: Arc::clone(&self.storage),
            key: key.clone(),
            data,
        })
    }

    /// Snapshot of the data
    pub async fn get_data(&self, key: &ContextKey) -> Result<StateData> {
        self.storage.get_data(key).await
    }

    /// Set several data fields; fails if no state is set
    pub async fn add_data<I, K>(&self, key: &ContextKey, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut names = Vec::new();
        for (field, value) in fields {
            self.storage.set_data(key, field.as_ref(), value).await?;
            names.push(field.as_ref().to_string());
        }
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        log_data_update(key, &names);
        Ok(())
    }
}

/// Editable copy of a context's data
///
/// Changes are written back only by [`commit`](Self::commit); dropping the
/// guard discards them.
#[derive(Debug)]
pub struct StateDataGuard {
    storage: Arc<dyn StateStorage>,
    key: ContextKey,
    data: StateData,
}

impl StateDataGuard {
    pub fn key(&self) -> &ContextKey {
        &self.key
    }

    /// Write the data back to storage
    pub async fn commit(self) -> Result<()> {
        let fields: Vec<String> = self.data.keys().cloned().collect();
        self.storage.save_data(&self.key, self.data).await?;

        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        log_data_update(&self.key, &fields);
        Ok(())
    }

    pub fn into_inner(self) -> StateData {
        self.data
    }
}

impl Deref for StateDataGuard {
    type Target = StateData;

    fn deref(&self) -> &StateData {
        &self.data
    }
}

impl DerefMut for StateDataGuard {
    fn deref_mut(&mut self) -> &mut StateData {
        &mut self.data
    }
}
