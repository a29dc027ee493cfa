//! Bot handlers module
//!
//! A registration conversation driven by [`StateContext`]:
//! - Command handlers for `/start`, `/cancel`, `/reset`, `/state`, `/help`
//! - Message handlers for each registration step
//! - Callback handlers for the confirmation keyboard

pub mod callbacks;
pub mod commands;
pub mod messages;

use teloxide::types::Message;
use tracing::warn;
use crate::state::{StateContext, StateFilter};

crate::states_group!(pub Registration { name, age, confirm });

/// Dispatcher predicate: the sender is somewhere in the registration flow
pub async fn in_registration(state: StateContext<Message>) -> bool {
    match StateFilter::group(Registration::all()).check(&state).await {
        Ok(matches) => matches,
        Err(e) => {
            warn!(error = %e, "State lookup failed while filtering");
            false
        }
    }
}

// Re-export commonly used handler functions
pub use callbacks::handle_callback_query;
pub use commands::{handle_command, Command};
pub use messages::{handle_idle_message, handle_registration_message};
