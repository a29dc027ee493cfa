//! State context injection
//!
//! Projection functions for `dptree::map`: they take the update payload and
//! the injected [`StateManager`] and produce the [`StateContext`] handlers ask for.
//!
//! ```ignore
//! Update::filter_message()
//!     .map(telestate::middleware::message_context)
//!     .endpoint(handle_message)
//! ```

use std::sync::Arc;
use teloxide::types::{CallbackQuery, Message};
use tracing::{debug, warn};
use crate::state::{ContextSource, StateContext, StateManager};

/// Wrap a message into its state context
pub fn message_context(msg: Message, manager: Arc<StateManager>) -> StateContext<Message> {
    trace_context(&msg, &manager, "message");
    StateContext::new(msg, manager)
}

/// Wrap a callback query into its state context
///
/// Inline-mode callbacks have no attached message; their context still builds,
/// but state operations on it fail with `UnresolvableContext`.
pub fn callback_context(query: CallbackQuery, manager: Arc<StateManager>) -> StateContext<CallbackQuery> {
    trace_context(&query, &manager, "callback_query");
    StateContext::new(query, manager)
}

fn trace_context<E: ContextSource>(event: &E, manager: &StateManager, kind: &'static str) {
    match event.resolve_context(manager.bot_id()) {
        Ok(key) => debug!(
            update = kind,
            chat_id = key.chat_id,
            user_id = key.user_id,
            business_connection_id = ?key.business_connection_id,
            thread_id = ?key.message_thread_id,
            "State context attached"
        ),
        Err(e) => warn!(update = kind, error = %e, "State context cannot be resolved"),
    }
}
