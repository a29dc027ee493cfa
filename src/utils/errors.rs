//! Error handling for telestate
//!
//! This module defines the error type shared by state resolution, the storage
//! engines and the demo bot.

use thiserror::Error;

/// Main error type for state operations
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot resolve state context: {0}")]
    UnresolvableContext(String),

    #[error("No state set for key: {key}")]
    StateNotSet { key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for state operations
pub type Result<T> = std::result::Result<T, StateError>;

impl From<config::ConfigError> for StateError {
    fn from(err: config::ConfigError) -> Self {
        StateError::Config(err.to_string())
    }
}

impl StateError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            StateError::Telegram(_) => true,
            StateError::Redis(_) => true,
            StateError::Io(_) => true,
            StateError::Serialization(_) => false,
            StateError::Config(_) => false,
            StateError::UnresolvableContext(_) => false,
            StateError::StateNotSet { .. } => false,
            StateError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StateError::Config(_) => ErrorSeverity::Critical,
            StateError::StateNotSet { .. } => ErrorSeverity::Warning,
            StateError::UnresolvableContext(_) => ErrorSeverity::Warning,
            StateError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
