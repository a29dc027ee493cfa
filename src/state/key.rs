//! Context tuple and storage key derivation

use serde::{Deserialize, Serialize};

/// Addressing tuple that scopes a state and its data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextKey {
    pub chat_id: i64,
    pub user_id: i64,
    pub business_connection_id: Option<String>,
    pub bot_id: i64,
    pub message_thread_id: Option<i32>,
}

impl ContextKey {
    pub fn new(chat_id: i64, user_id: i64, bot_id: i64) -> Self {
        Self {
            chat_id,
            user_id,
            business_connection_id: None,
            bot_id,
            message_thread_id: None,
        }
    }

    pub fn with_business_connection(mut self, business_connection_id: impl Into<String>) -> Self {
        self.business_connection_id = Some(business_connection_id.into());
        self
    }

    pub fn with_thread(mut self, message_thread_id: i32) -> Self {
        self.message_thread_id = Some(message_thread_id);
        self
    }
}

/// Builds storage keys from context tuples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    prefix: String,
    separator: String,
}

impl KeyBuilder {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    /// Components in order: prefix, bot, business connection (`b` tag),
    /// thread (`t` tag), chat, user. Absent optional components are skipped;
    /// the tags keep a business connection id from colliding with a thread id.
    pub fn build(&self, key: &ContextKey) -> String {
        let mut parts = vec![self.prefix.clone(), key.bot_id.to_string()];
        if let Some(business_connection_id) = &key.business_connection_id {
            parts.push(format!("b{}", business_connection_id));
        }
        if let Some(thread_id) = key.message_thread_id {
            parts.push(format!("t{}", thread_id));
        }
        parts.push(key.chat_id.to_string());
        parts.push(key.user_id.to_string());
        parts.join(&self.separator)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self::new("telestate", ":")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_key() {
        let key = ContextKey::new(-100, 42, 7);
        assert_eq!(KeyBuilder::default().build(&key), "telestate:7:-100:42");
    }

    #[test]
    fn test_key_with_all_components() {
        let key = ContextKey::new(-100, 42, 7)
            .with_business_connection("bc1")
            .with_thread(15);
        assert_eq!(KeyBuilder::default().build(&key), "telestate:7:bbc1:t15:-100:42");
    }

    #[test]
    fn test_custom_prefix_and_separator() {
        let builder = KeyBuilder::new("bot", "/");
        let key = ContextKey::new(1, 2, 3).with_thread(4);
        assert_eq!(builder.build(&key), "bot/3/t4/1/2");
        assert_eq!(builder.prefix(), "bot");
    }

    #[test]
    fn test_thread_scopes_are_distinct() {
        let builder = KeyBuilder::default();
        let general = ContextKey::new(-100, 42, 7);
        let topic = general.clone().with_thread(3);
        assert_ne!(builder.build(&general), builder.build(&topic));
    }

    #[test]
    fn test_business_id_does_not_collide_with_thread() {
        let builder = KeyBuilder::default();
        let business = ContextKey::new(1, 2, 3).with_business_connection("15");
        let topic = ContextKey::new(1, 2, 3).with_thread(15);
        assert_ne!(builder.build(&business), builder.build(&topic));
    }
}
