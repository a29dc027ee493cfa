//! Message handlers module
//!
//! Handles text answers for each registration step. Input parsing is kept in
//! plain functions so it can be tested without a bot.

use serde_json::json;
use teloxide::{Bot, types::{InlineKeyboardButton, InlineKeyboardMarkup, Message}, prelude::*};
use tracing::debug;
use crate::utils::errors::{StateError, Result};
use crate::state::{StateContext, StateData};
use crate::handlers::Registration;

/// Longest accepted name, in characters
pub const MAX_NAME_LENGTH: usize = 64;

/// Handle a message from a user inside the registration flow
pub async fn handle_registration_message(
    bot: Bot,
    msg: Message,
    state: StateContext<Message>,
) -> Result<()> {
    let current = state.get().await?;
    let text = msg.text().unwrap_or_default().to_string();
    debug!(state = ?current, "Processing registration answer");

    match current.as_deref() {
        Some(step) if Registration::name == step => handle_name(bot, msg, state, &text).await,
        Some(step) if Registration::age == step => handle_age(bot, msg, state, &text).await,
        Some(step) if Registration::confirm == step => {
            bot.send_message(msg.chat.id, "Please use the buttons above to confirm or restart.").await?;
            Ok(())
        }
        _ => handle_idle_message(bot, msg).await,
    }
}

/// Handle a message from a user with no active step
pub async fn handle_idle_message(bot: Bot, msg: Message) -> Result<()> {
    if msg.chat.is_private() {
        bot.send_message(msg.chat.id, "Send /start to register.").await?;
    }
    Ok(())
}

async fn handle_name(bot: Bot, msg: Message, state: StateContext<Message>, text: &str) -> Result<()> {
    let name = match parse_name(text) {
        Ok(name) => name,
        Err(StateError::InvalidInput(reason)) => {
            bot.send_message(msg.chat.id, reason).await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    state.add_data([("name", json!(name))]).await?;
    state.set(Registration::age).await?;

    bot.send_message(msg.chat.id, format!("Nice to meet you, {}! How old are you?", name)).await?;
    Ok(())
}

async fn handle_age(bot: Bot, msg: Message, state: StateContext<Message>, text: &str) -> Result<()> {
    let age = match parse_age(text) {
        Ok(age) => age,
        Err(StateError::InvalidInput(reason)) => {
            bot.send_message(msg.chat.id, reason).await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut data = state.data().await?;
    data.insert("age".to_string(), json!(age));
    let summary = format_summary(&data);
    data.commit().await?;

    state.set(Registration::confirm).await?;

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Confirm", "reg:confirm"),
        InlineKeyboardButton::callback("Start over", "reg:restart"),
    ]]);

    bot.send_message(msg.chat.id, format!("Please check your answers:\n{}", summary))
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Validate a name answer
pub fn parse_name(text: &str) -> Result<String> {
    let name = text.trim();
    if name.is_empty() {
        return Err(StateError::InvalidInput("Please send your name as text.".to_string()));
    }
    if name.starts_with('/') {
        return Err(StateError::InvalidInput("That looks like a command, not a name.".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(StateError::InvalidInput(format!(
            "Please keep your name under {} characters.",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

/// Validate an age answer
pub fn parse_age(text: &str) -> Result<u8> {
    match text.trim().parse::<u8>() {
        Ok(age) if (1..=120).contains(&age) => Ok(age),
        Ok(_) => Err(StateError::InvalidInput("Please send an age between 1 and 120.".to_string())),
        Err(_) => Err(StateError::InvalidInput("Please send your age as a number.".to_string())),
    }
}

/// Human-readable listing of the collected answers
pub fn format_summary(data: &StateData) -> String {
    let name = data.get("name").and_then(|v| v.as_str()).unwrap_or("-");
    let age = data
        .get("age")
        .and_then(|v| v.as_u64())
        .map(|age| age.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("Name: {}\nAge: {}", name, age)
}
