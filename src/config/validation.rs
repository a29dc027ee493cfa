//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{StateError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(StateError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.separator.is_empty() {
        return Err(StateError::Config(
            "Storage key separator must not be empty".to_string()
        ));
    }

    // Key components are decimal ids, tagged ids and business connection ids,
    // so a separator made of such characters could split two tuples the same way
    if config.separator.chars().any(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(StateError::Config(
            format!("Storage key separator '{}' must not contain letters, digits or '-'", config.separator)
        ));
    }

    if config.prefix.contains(config.separator.as_str()) {
        return Err(StateError::Config(
            format!("Storage prefix '{}' must not contain the separator '{}'", config.prefix, config.separator)
        ));
    }

    match config.backend {
        StorageBackend::Memory => {}
        StorageBackend::File => {
            if config.file_path.is_empty() {
                return Err(StateError::Config(
                    "File storage path is required".to_string()
                ));
            }
        }
        StorageBackend::Redis => validate_redis_config(&config.redis)?,
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(StateError::Config(
            "Redis URL is required".to_string()
        ));
    }

    if config.ttl_seconds == Some(0) {
        return Err(StateError::Config(
            "Redis TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(StateError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(StateError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123:abc".to_string();
        settings
    }

    #[test]
    fn test_valid_defaults_with_token() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_token() {
        let settings = Settings::default();
        assert_matches!(validate_settings(&settings), Err(StateError::Config(_)));
    }

    #[test]
    fn test_prefix_with_separator() {
        let mut settings = valid_settings();
        settings.storage.prefix = "my:bot".to_string();
        assert_matches!(validate_settings(&settings), Err(StateError::Config(msg)) if msg.contains("separator"));
    }

    #[test]
    fn test_separator_that_can_appear_in_ids() {
        for separator in ["1", "-", "b", "t", "::x"] {
            let mut settings = valid_settings();
            settings.storage.separator = separator.to_string();
            assert_matches!(
                validate_settings(&settings),
                Err(StateError::Config(msg)) if msg.contains("separator"),
                "separator {:?} should be rejected",
                separator
            );
        }

        let mut settings = valid_settings();
        settings.storage.separator = "/".to_string();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_zero_redis_ttl() {
        let mut settings = valid_settings();
        settings.storage.backend = StorageBackend::Redis;
        settings.storage.redis.ttl_seconds = Some(0);
        assert_matches!(validate_settings(&settings), Err(StateError::Config(_)));

        // TTL is only checked when Redis is the active backend
        settings.storage.backend = StorageBackend::Memory;
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(StateError::Config(_)));
    }
}
