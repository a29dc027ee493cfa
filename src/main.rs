//! Telestate demo bot
//!
//! Runs a small registration conversation on top of the state storage
//! selected in configuration.

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{info, warn, error};

use telestate::{
    config::Settings,
    utils::logging,
    state::{open_storage, StateContext, StateManager},
    middleware::{callback_context, message_context},
    handlers::{self, Command},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", telestate::info());

    let bot = Bot::new(&settings.bot.token);
    let me = bot.get_me().await?;
    info!(username = %me.username(), bot_id = me.id.0, "Authorized");

    // Initialize state management
    let storage = open_storage(&settings.storage).await?;
    let manager = Arc::new(StateManager::new(storage, me.id.0 as i64));

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![manager])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("Bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .chain(dptree::map(message_context))
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    dptree::filter_async(handlers::in_registration)
                        .endpoint(handle_registration),
                )
                .branch(dptree::endpoint(handle_idle)),
        )
        .branch(
            Update::filter_callback_query()
                .chain(dptree::map(callback_context))
                .endpoint(handle_callbacks),
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: StateContext<Message>,
) -> HandlerResult {
    if let Err(e) = handlers::handle_command(bot, msg, cmd, state).await {
        error!(error = %e, severity = %e.severity(), "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle answers inside the registration flow
async fn handle_registration(
    bot: Bot,
    msg: Message,
    state: StateContext<Message>,
) -> HandlerResult {
    if let Err(e) = handlers::handle_registration_message(bot, msg, state).await {
        error!(error = %e, severity = %e.severity(), "Error handling registration message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle messages outside any flow
async fn handle_idle(bot: Bot, msg: Message) -> HandlerResult {
    if let Err(e) = handlers::handle_idle_message(bot, msg).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    state: StateContext<CallbackQuery>,
) -> HandlerResult {
    if let Err(e) = handlers::handle_callback_query(bot, query, state).await {
        error!(error = %e, severity = %e.severity(), "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
