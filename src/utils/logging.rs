//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging helpers
//! for state changes.

use tracing::{info, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use crate::config::LoggingConfig;
use crate::state::ContextKey;
use crate::utils::errors::{StateError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer when dropped, so the caller must
/// hold it for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| StateError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let stdout_layer = if config.json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "telestate.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().with_ansi(false).with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| StateError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a state label change for a context; `None` means the state was cleared
pub fn log_state_transition(key: &ContextKey, to: Option<&str>) {
    info!(
        chat_id = key.chat_id,
        user_id = key.user_id,
        thread_id = ?key.message_thread_id,
        to = to.unwrap_or("<none>"),
        "State transition"
    );
}

/// Log a data mutation for a context
pub fn log_data_update(key: &ContextKey, fields: &[&str]) {
    debug!(
        chat_id = key.chat_id,
        user_id = key.user_id,
        fields = ?fields,
        "State data updated"
    );
}
