//! Per-event state context
//!
//! [`StateContext`] wraps one incoming event together with the bot's
//! [`StateManager`]. Every call resolves the context tuple from the event and
//! forwards to the manager, so handlers never spell out chat, user, thread or
//! business connection ids.
//!
//! ```no_run
//! # use telestate::state::StateContext;
//! # use teloxide::types::Message;
//! telestate::states_group!(Registration { name, age });
//!
//! async fn start(state: StateContext<Message>) -> telestate::Result<()> {
//!     state.set(Registration::name).await?;
//!     state.add_data([("source", serde_json::json!("start"))]).await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use serde_json::Value;
use crate::utils::errors::Result;
use super::key::ContextKey;
use super::manager::{StateDataGuard, StateManager};
use super::resolve::ContextSource;
use super::storage::StateData;

/// State operations scoped to the context of one event
#[derive(Debug, Clone)]
pub struct StateContext<E> {
    event: E,
    manager: Arc<StateManager>,
}

impl<E: ContextSource> StateContext<E> {
    pub fn new(event: E, manager: Arc<StateManager>) -> Self {
        Self { event, manager }
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn manager(&self) -> &Arc<StateManager> {
        &self.manager
    }

    /// Context tuple of the wrapped event
    pub fn key(&self) -> Result<ContextKey> {
        self.event.resolve_context(self.manager.bot_id())
    }

    /// Set state for the current user
    pub async fn set(&self, state: impl AsRef<str>) -> Result<bool> {
        let key = self.key()?;
        self.manager.set_state(&key, state).await
    }

    /// Current state name for the current user
    pub async fn get(&self) -> Result<Option<String>> {
        let key = self.key()?;
        self.manager.get_state(&key).await
    }

    /// Delete the state **and** the data for the current user
    pub async fn delete(&self) -> Result<bool> {
        let key = self.key()?;
        self.manager.delete_state(&key).await
    }

    /// Clear the data for the current user; the state is not changed
    pub async fn reset_data(&self) -> Result<bool> {
        let key = self.key()?;
        self.manager.reset_data(&key).await
    }

    /// Data for the current user, editable in place
    ///
    /// ```no_run
    /// # use telestate::state::StateContext;
    /// # use teloxide::types::Message;
    /// # async fn rename(state: StateContext<Message>) -> telestate::Result<()> {
    /// let mut data = state.data().await?;
    /// data.insert("name".to_string(), serde_json::json!("John"));
    /// data.commit().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn data(&self) -> Result<StateDataGuard> {
        let key = self.key()?;
        self.manager.retrieve_data(&key).await
    }

    /// Read-only snapshot of the data
    pub async fn get_data(&self) -> Result<StateData> {
        let key = self.key()?;
        self.manager.get_data(&key).await
    }

    /// Add fields to the data for the current user
    pub async fn add_data<I, K>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let key = self.key()?;
        self.manager.add_data(&key, fields).await
    }

    /// Whether the current state equals `state`
    pub async fn is_in(&self, state: impl AsRef<str>) -> Result<bool> {
        Ok(self.get().await?.as_deref() == Some(state.as_ref()))
    }
}
