//! Registration lifecycle commands

use teloxide::{Bot, types::Message, prelude::*};
use tracing::info;
use crate::utils::errors::Result;
use crate::state::StateContext;
use crate::handlers::Registration;
use crate::handlers::messages::format_summary;

/// Handle /start: begin (or restart) registration
pub async fn handle_start(bot: Bot, msg: Message, state: StateContext<Message>) -> Result<()> {
    // A restart must not carry answers over from an earlier attempt
    state.delete().await?;
    state.set(Registration::name).await?;

    let key = state.key()?;
    info!(chat_id = key.chat_id, user_id = key.user_id, "Registration started");

    bot.send_message(msg.chat.id, "Hi! What is your name?").await?;
    Ok(())
}

/// Handle /cancel: drop state and data
pub async fn handle_cancel(bot: Bot, msg: Message, state: StateContext<Message>) -> Result<()> {
    let text = if state.delete().await? {
        "Registration cancelled."
    } else {
        "Nothing to cancel. Send /start to register."
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Handle /reset: drop the answers, keep the step
pub async fn handle_reset(bot: Bot, msg: Message, state: StateContext<Message>) -> Result<()> {
    let text = if state.reset_data().await? {
        "Your answers were cleared. Continue from the current step."
    } else {
        "You are not registering right now. Send /start to begin."
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Handle /state: show the current step and answers
pub async fn handle_show_state(bot: Bot, msg: Message, state: StateContext<Message>) -> Result<()> {
    let text = match state.get().await? {
        Some(current) => {
            let data = state.get_data().await?;
            format!("Current step: {}\n{}", current, format_summary(&data))
        }
        None => "No active step.".to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
