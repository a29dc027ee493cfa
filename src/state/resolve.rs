//! Context resolution
//!
//! Maps incoming Telegram events onto the [`ContextKey`] that scopes their
//! state. A message is addressed by its chat and sender; forum topics get their
//! own scope only for messages that actually belong to a topic.

use teloxide::types::{CallbackQuery, ChatJoinRequest, ChatMemberUpdated, Message, MessageKind};
use crate::utils::errors::{StateError, Result};
use super::key::ContextKey;

/// An event that can be mapped onto a state context tuple
pub trait ContextSource {
    fn resolve_context(&self, bot_id: i64) -> Result<ContextKey>;
}

/// Only ordinary messages can arrive through a business connection
fn business_connection(message: &Message) -> Option<String> {
    match &message.kind {
        MessageKind::Common(common) => common.business_connection_id.as_ref().map(|id| id.0.clone()),
        _ => None,
    }
}

fn topic_thread(message: &Message) -> Option<i32> {
    if message.is_topic_message {
        message.thread_id.map(|thread| thread.0 .0)
    } else {
        None
    }
}

impl ContextSource for Message {
    fn resolve_context(&self, bot_id: i64) -> Result<ContextKey> {
        let chat_id = self.chat.id.0;
        // Channel posts carry no sender
        let user_id = self.from.as_ref().map(|user| user.id.0 as i64).unwrap_or(chat_id);

        Ok(ContextKey {
            chat_id,
            user_id,
            business_connection_id: business_connection(self),
            bot_id,
            message_thread_id: topic_thread(self),
        })
    }
}

impl ContextSource for CallbackQuery {
    fn resolve_context(&self, bot_id: i64) -> Result<ContextKey> {
        let attached = self.message.as_ref().ok_or_else(|| {
            StateError::UnresolvableContext(format!(
                "callback query {} has no attached message",
                self.id
            ))
        })?;

        let regular = attached.regular_message();
        Ok(ContextKey {
            chat_id: attached.chat().id.0,
            user_id: self.from.id.0 as i64,
            business_connection_id: regular.and_then(business_connection),
            bot_id,
            message_thread_id: regular.and_then(topic_thread),
        })
    }
}

impl ContextSource for ChatMemberUpdated {
    fn resolve_context(&self, bot_id: i64) -> Result<ContextKey> {
        Ok(ContextKey::new(self.chat.id.0, self.from.id.0 as i64, bot_id))
    }
}

impl ContextSource for ChatJoinRequest {
    fn resolve_context(&self, bot_id: i64) -> Result<ContextKey> {
        Ok(ContextKey::new(self.chat.id.0, self.from.id.0 as i64, bot_id))
    }
}

impl<T: ContextSource + ?Sized> ContextSource for &T {
    fn resolve_context(&self, bot_id: i64) -> Result<ContextKey> {
        (**self).resolve_context(bot_id)
    }
}

impl ContextSource for ContextKey {
    /// An explicit tuple resolves to itself, re-stamped with the bot id
    fn resolve_context(&self, bot_id: i64) -> Result<ContextKey> {
        Ok(ContextKey { bot_id, ..self.clone() })
    }
}
