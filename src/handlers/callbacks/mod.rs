//! Callback query handlers module
//!
//! Handles the confirmation keyboard shown at the end of registration.

use teloxide::{Bot, types::{CallbackQuery, ChatId}, prelude::*};
use tracing::{info, warn};
use crate::utils::errors::Result;
use crate::state::StateContext;
use crate::handlers::Registration;
use crate::handlers::messages::format_summary;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    state: StateContext<CallbackQuery>,
) -> Result<()> {
    // Answer first to remove the loading indicator
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };

    let key = match state.key() {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, callback_data = %data, "Ignoring callback without a state context");
            return Ok(());
        }
    };
    let chat_id = ChatId(key.chat_id);

    if !state.is_in(Registration::confirm).await? {
        bot.send_message(chat_id, "This registration is no longer active. Send /start to begin again.").await?;
        return Ok(());
    }

    match data {
        "reg:confirm" => {
            let answers = state.get_data().await?;
            state.delete().await?;
            info!(chat_id = key.chat_id, user_id = key.user_id, "Registration completed");
            bot.send_message(chat_id, format!("Registration complete!\n{}", format_summary(&answers))).await?;
        }
        "reg:restart" => {
            state.reset_data().await?;
            state.set(Registration::name).await?;
            bot.send_message(chat_id, "Let's start over. What is your name?").await?;
        }
        other => {
            warn!(callback_data = %other, "Unknown callback data");
        }
    }

    Ok(())
}
