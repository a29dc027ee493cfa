//! Redis state storage
//!
//! Each context is a Redis hash with a `state` field holding the label and a
//! `data` field holding the data map as JSON text.

use async_trait::async_trait;
use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, error, info};
use crate::config::RedisConfig;
use crate::state::key::{ContextKey, KeyBuilder};
use crate::utils::errors::{StateError, Result};
use super::{StateData, StateStorage};

const STATE_FIELD: &str = "state";
const DATA_FIELD: &str = "data";
const EMPTY_DATA: &str = "{}";

/// Redis-based state storage
#[derive(Clone)]
pub struct RedisStorage {
    /// Redis connection manager
    connection_manager: ConnectionManager,
    keys: KeyBuilder,
    config: RedisConfig,
}

impl RedisStorage {
    /// Create a new state storage instance
    pub async fn new(config: &RedisConfig, keys: KeyBuilder) -> Result<Self> {
        let client = ::redis::Client::open(config.url.as_str())?;
        let connection_manager = ConnectionManager::new(client).await?;

        info!(url = %config.url, ttl_seconds = ?config.ttl_seconds, "Connected to Redis state storage");

        Ok(Self {
            connection_manager,
            keys,
            config: config.clone(),
        })
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn parse_data(key: &str, raw: Option<String>) -> Result<StateData> {
        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                error!(key = %key, error = %e, "Failed to deserialize state data");
                StateError::from(e)
            }),
            None => Ok(StateData::new()),
        }
    }

    async fn ensure_exists(&self, conn: &mut ConnectionManager, key: &str) -> Result<()> {
        let exists: bool = conn.exists(key).await?;
        if exists {
            Ok(())
        } else {
            Err(StateError::StateNotSet { key: key.to_string() })
        }
    }
}

#[async_trait]
impl StateStorage for RedisStorage {
    async fn set_state(&self, key: &ContextKey, state: &str) -> Result<bool> {
        let key = self.keys.build(key);
        let mut conn = self.connection_manager.clone();

        let mut pipe = ::redis::pipe();
        pipe.atomic()
            .hset(&key, STATE_FIELD, state)
            .ignore()
            .hset_nx(&key, DATA_FIELD, EMPTY_DATA)
            .ignore();
        if let Some(ttl) = self.config.ttl_seconds {
            pipe.expire(&key, ttl as i64).ignore();
        }

        let _: () = pipe.query_async(&mut conn).await?;
        debug!(key = %key, state = state, "State saved to Redis");
        Ok(true)
    }

    async fn get_state(&self, key: &ContextKey) -> Result<Option<String>> {
        let key = self.keys.build(key);
        let mut conn = self.connection_manager.clone();

        let state: Option<String> = conn.hget(&key, STATE_FIELD).await?;
        debug!(key = %key, has_state = state.is_some(), "Redis HGET state");
        Ok(state)
    }

    async fn delete_state(&self, key: &ContextKey) -> Result<bool> {
        let key = self.keys.build(key);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(key = %key, deleted = deleted > 0, "State deletion attempted");
        Ok(deleted > 0)
    }

    async fn set_data(&self, key: &ContextKey, field: &str, value: Value) -> Result<()> {
        let key = self.keys.build(key);
        let mut conn = self.connection_manager.clone();
        self.ensure_exists(&mut conn, &key).await?;

        let raw: Option<String> = conn.hget(&key, DATA_FIELD).await?;
        let mut data = Self::parse_data(&key, raw)?;
        data.insert(field.to_string(), value);

        let _: () = conn.hset(&key, DATA_FIELD, serde_json::to_string(&data)?).await?;
        debug!(key = %key, field = field, "State data field saved to Redis");
        Ok(())
    }

    async fn get_data(&self, key: &ContextKey) -> Result<StateData> {
        let key = self.keys.build(key);
        let mut conn = self.connection_manager.clone();

        let raw: Option<String> = conn.hget(&key, DATA_FIELD).await?;
        Self::parse_data(&key, raw)
    }

    async fn reset_data(&self, key: &ContextKey) -> Result<bool> {
        let key = self.keys.build(key);
        let mut conn = self.connection_manager.clone();

        let exists: bool = conn.exists(&key).await?;
        if !exists {
            return Ok(false);
        }

        let _: () = conn.hset(&key, DATA_FIELD, EMPTY_DATA).await?;
        debug!(key = %key, "State data reset in Redis");
        Ok(true)
    }

    async fn save_data(&self, key: &ContextKey, data: StateData) -> Result<()> {
        let key = self.keys.build(key);
        let mut conn = self.connection_manager.clone();
        self.ensure_exists(&mut conn, &key).await?;

        let _: () = conn.hset(&key, DATA_FIELD, serde_json::to_string(&data)?).await?;
        debug!(key = %key, fields = data.len(), "State data saved to Redis");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

impl std::fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStorage")
            .field("keys", &self.keys)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
