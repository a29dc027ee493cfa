//! Test helpers module
//!
//! Builds Telegram updates from Bot API JSON so tests exercise the same
//! deserialization path as real updates.

#![allow(dead_code)]

use std::sync::Arc;
use serde_json::{json, Value};
use teloxide::types::{CallbackQuery, ChatJoinRequest, ChatMemberUpdated, Message};
use telestate::state::{MemoryStorage, StateManager};

pub const TEST_BOT_ID: i64 = 5_000_000_001;
pub const TEST_USER_ID: i64 = 987_654_321;
pub const TEST_GROUP_ID: i64 = -1_001_234_567_890;
pub const TEST_DATE: i64 = 1_700_000_000;

pub fn user_json(user_id: i64) -> Value {
    json!({
        "id": user_id,
        "is_bot": false,
        "first_name": "Test",
        "username": format!("user{}", user_id),
        "language_code": "en"
    })
}

pub fn private_chat_json(user_id: i64) -> Value {
    json!({ "id": user_id, "type": "private", "first_name": "Test" })
}

pub fn forum_chat_json(chat_id: i64) -> Value {
    json!({ "id": chat_id, "type": "supergroup", "title": "Test Forum", "is_forum": true })
}

pub fn channel_chat_json(chat_id: i64) -> Value {
    json!({ "id": chat_id, "type": "channel", "title": "Test Channel" })
}

/// Text message from `user_id` in their private chat
pub fn private_message_json(user_id: i64, text: &str) -> Value {
    json!({
        "message_id": 1,
        "date": TEST_DATE,
        "chat": private_chat_json(user_id),
        "from": user_json(user_id),
        "text": text
    })
}

/// Text message posted inside forum topic `thread_id`
pub fn topic_message_json(chat_id: i64, user_id: i64, thread_id: i32, text: &str) -> Value {
    json!({
        "message_id": 2,
        "message_thread_id": thread_id,
        "is_topic_message": true,
        "date": TEST_DATE,
        "chat": forum_chat_json(chat_id),
        "from": user_json(user_id),
        "text": text
    })
}

pub fn message(value: Value) -> Message {
    serde_json::from_value(value).expect("valid message JSON")
}

pub fn private_message(user_id: i64, text: &str) -> Message {
    message(private_message_json(user_id, text))
}

pub fn topic_message(chat_id: i64, user_id: i64, thread_id: i32, text: &str) -> Message {
    message(topic_message_json(chat_id, user_id, thread_id, text))
}

pub fn business_message(user_id: i64, connection_id: &str, text: &str) -> Message {
    let mut value = private_message_json(user_id, text);
    value["business_connection_id"] = json!(connection_id);
    message(value)
}

pub fn channel_post(chat_id: i64, text: &str) -> Message {
    message(json!({
        "message_id": 3,
        "date": TEST_DATE,
        "chat": channel_chat_json(chat_id),
        "text": text
    }))
}

/// Callback query from `user_id` on a bot message described by `message_json`
pub fn callback_query(user_id: i64, message_json: Value, data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "4382bfdwdsb323b2d9",
        "from": user_json(user_id),
        "chat_instance": "-5432112345",
        "message": message_json,
        "data": data
    }))
    .expect("valid callback query JSON")
}

/// Callback query on an inline-mode message; it carries no chat
pub fn inline_callback_query(user_id: i64, data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "4382bfdwdsb323b2da",
        "from": user_json(user_id),
        "chat_instance": "-5432112345",
        "inline_message_id": "BAAAAAAAAAAAAAA",
        "data": data
    }))
    .expect("valid inline callback query JSON")
}

pub fn chat_join_request(chat_id: i64, user_id: i64) -> ChatJoinRequest {
    serde_json::from_value(json!({
        "chat": forum_chat_json(chat_id),
        "from": user_json(user_id),
        "user_chat_id": user_id,
        "date": TEST_DATE
    }))
    .expect("valid chat join request JSON")
}

pub fn chat_member_updated(chat_id: i64, user_id: i64) -> ChatMemberUpdated {
    serde_json::from_value(json!({
        "chat": forum_chat_json(chat_id),
        "from": user_json(user_id),
        "date": TEST_DATE,
        "old_chat_member": { "user": user_json(user_id), "status": "left" },
        "new_chat_member": { "user": user_json(user_id), "status": "member" }
    }))
    .expect("valid chat member update JSON")
}

/// Manager over a fresh in-memory storage
pub fn memory_manager() -> Arc<StateManager> {
    Arc::new(StateManager::new(Arc::new(MemoryStorage::default()), TEST_BOT_ID))
}
