//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod help;
pub mod start;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::utils::errors::Result;
use crate::state::StateContext;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Registration demo commands:")]
pub enum Command {
    #[command(description = "Start registration")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Abort registration and forget your answers")]
    Cancel,
    #[command(description = "Forget your answers but stay on the current step")]
    Reset,
    #[command(description = "Show the current step and answers")]
    State,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: StateContext<Message>,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, state).await,
        Command::Help => help::handle_help(bot, msg).await,
        Command::Cancel => start::handle_cancel(bot, msg, state).await,
        Command::Reset => start::handle_reset(bot, msg, state).await,
        Command::State => start::handle_show_state(bot, msg, state).await,
    }
}
