//! Context resolution tests for each supported update kind

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use helpers::*;
use telestate::{ContextKey, ContextSource, StateError};

#[test]
fn test_private_message() {
    let msg = private_message(TEST_USER_ID, "hello");
    let key = msg.resolve_context(TEST_BOT_ID).unwrap();

    assert_eq!(key, ContextKey::new(TEST_USER_ID, TEST_USER_ID, TEST_BOT_ID));
}

#[test]
fn test_topic_message_is_scoped_to_thread() {
    let msg = topic_message(TEST_GROUP_ID, TEST_USER_ID, 42, "hello");
    let key = msg.resolve_context(TEST_BOT_ID).unwrap();

    assert_eq!(key.chat_id, TEST_GROUP_ID);
    assert_eq!(key.user_id, TEST_USER_ID);
    assert_eq!(key.message_thread_id, Some(42));
    assert_eq!(key.business_connection_id, None);
}

#[test]
fn test_thread_ignored_outside_topics() {
    // Replies in ordinary supergroups carry a thread id without being topic messages
    let mut value = topic_message_json(TEST_GROUP_ID, TEST_USER_ID, 42, "reply");
    value["is_topic_message"] = json!(false);
    let key = message(value).resolve_context(TEST_BOT_ID).unwrap();

    assert_eq!(key.message_thread_id, None);
}

#[test]
fn test_business_message() {
    let msg = business_message(TEST_USER_ID, "biz-conn-1", "hello");
    let key = msg.resolve_context(TEST_BOT_ID).unwrap();

    assert_eq!(key.business_connection_id.as_deref(), Some("biz-conn-1"));
    assert_eq!(key.chat_id, TEST_USER_ID);
}

#[test]
fn test_channel_post_falls_back_to_chat() {
    let msg = channel_post(-1_009_999, "news");
    let key = msg.resolve_context(TEST_BOT_ID).unwrap();

    assert_eq!(key.chat_id, -1_009_999);
    assert_eq!(key.user_id, -1_009_999);
}

#[test]
fn test_callback_uses_presser_and_message_chat() {
    let presser = TEST_USER_ID + 1;
    let query = callback_query(
        presser,
        topic_message_json(TEST_GROUP_ID, TEST_USER_ID, 7, "pick one"),
        "reg:confirm",
    );
    let key = query.resolve_context(TEST_BOT_ID).unwrap();

    assert_eq!(key.chat_id, TEST_GROUP_ID);
    assert_eq!(key.user_id, presser);
    assert_eq!(key.message_thread_id, Some(7));
}

#[test]
fn test_callback_on_business_message() {
    let mut attached = private_message_json(TEST_USER_ID, "confirm?");
    attached["business_connection_id"] = json!("biz-conn-2");
    let query = callback_query(TEST_USER_ID, attached, "reg:confirm");

    let key = query.resolve_context(TEST_BOT_ID).unwrap();
    assert_eq!(key.business_connection_id.as_deref(), Some("biz-conn-2"));
}

#[test]
fn test_callback_on_inaccessible_message() {
    // The Bot API reports inaccessible messages with date 0
    let attached = json!({
        "message_id": 11,
        "date": 0,
        "chat": forum_chat_json(TEST_GROUP_ID)
    });
    let query = callback_query(TEST_USER_ID, attached, "reg:confirm");

    let key = query.resolve_context(TEST_BOT_ID).unwrap();
    assert_eq!(key, ContextKey::new(TEST_GROUP_ID, TEST_USER_ID, TEST_BOT_ID));
}

#[test]
fn test_inline_callback_is_unresolvable() {
    let query = inline_callback_query(TEST_USER_ID, "reg:confirm");

    assert_matches!(
        query.resolve_context(TEST_BOT_ID),
        Err(StateError::UnresolvableContext(_))
    );
}

#[test]
fn test_join_request_and_member_update() {
    let request = chat_join_request(TEST_GROUP_ID, TEST_USER_ID);
    let update = chat_member_updated(TEST_GROUP_ID, TEST_USER_ID);
    let expected = ContextKey::new(TEST_GROUP_ID, TEST_USER_ID, TEST_BOT_ID);

    assert_eq!(request.resolve_context(TEST_BOT_ID).unwrap(), expected);
    assert_eq!(update.resolve_context(TEST_BOT_ID).unwrap(), expected);
}

#[test]
fn test_resolution_through_reference() {
    let msg = private_message(TEST_USER_ID, "hello");
    let by_ref = &msg;

    assert_eq!(
        by_ref.resolve_context(TEST_BOT_ID).unwrap(),
        msg.resolve_context(TEST_BOT_ID).unwrap()
    );
}
