//! Telestate
//!
//! Per-user conversation states for Telegram bots built on teloxide.
//! A [`StateContext`] wraps an incoming update and exposes set/get/delete of a
//! state label plus an auxiliary data map, scoped by chat, user, forum topic
//! and business connection. States live in memory, in a JSON file or in Redis.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{StateError, Result};

// Re-export main components for easy access
pub use state::{ContextKey, ContextSource, State, StateContext, StateFilter, StateManager, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
