//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bot.command_prefix must not be empty")]
    EmptyCommandPrefix,
    #[error("bot.command_prefix must not contain whitespace, got '{0}'")]
    WhitespaceCommandPrefix(String),
    #[error("channel name is empty or only a marker: '{0}'")]
    InvalidChannel(String),
    #[error("channel name contains whitespace: '{0}'")]
    ChannelWhitespace(String),
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
    #[error("moderation.notice_template must contain {{punishment}}")]
    NoticeMissingPunishment,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.bot.command_prefix;
    if prefix.is_empty() {
        errors.push(ValidationError::EmptyCommandPrefix);
    } else if prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::WhitespaceCommandPrefix(prefix.clone()));
    }

    let channels = config
        .channels
        .log_channels
        .iter()
        .chain(&config.channels.other_channels);
    for channel in channels {
        let name = channel.trim();
        if name.trim_start_matches('#').is_empty() {
            errors.push(ValidationError::InvalidChannel(channel.clone()));
        } else if name.chars().any(char::is_whitespace) {
            errors.push(ValidationError::ChannelWhitespace(channel.clone()));
        }
    }

    let db_path = Path::new(&config.database.path);
    if config.database.path != ":memory:"
        && let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        errors.push(ValidationError::DatabasePathInvalid(config.database.path.clone()));
    }

    if !config.moderation.notice_template.contains("{punishment}") {
        errors.push(ValidationError::NoticeMissingPunishment);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
