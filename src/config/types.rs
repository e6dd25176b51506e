//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_bot_nick, default_command_prefix, default_database_path, default_notice_template,
};
use super::validation::ValidationError;
use crate::db::Rule;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<ValidationError>),
}

/// Word guard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity and command syntax.
    #[serde(default)]
    pub bot: BotConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Monitored channels.
    #[serde(default)]
    pub channels: ChannelsConfig,
    /// Moderation behavior.
    #[serde(default)]
    pub moderation: ModerationConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        super::validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot nickname, used in logs.
    #[serde(default = "default_bot_nick")]
    pub nick: String,
    /// Prefix that marks a chat message as a command (default: "!").
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nick: default_bot_nick(),
            command_prefix: default_command_prefix(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or ":memory:".
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Channels whose rules are loaded at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelsConfig {
    /// Channels the bot logs.
    #[serde(default)]
    pub log_channels: Vec<String>,
    /// Other channels the bot joins.
    #[serde(default)]
    pub other_channels: Vec<String>,
}

impl ChannelsConfig {
    /// Union of both lists, normalized, first occurrence wins.
    pub fn monitored(&self) -> Vec<String> {
        let mut channels: Vec<String> = Vec::new();
        for channel in self.log_channels.iter().chain(&self.other_channels) {
            let channel = Rule::normalize_channel(channel);
            if !channel.is_empty() && !channels.iter().any(|c| c == channel) {
                channels.push(channel.to_string());
            }
        }
        channels
    }
}

/// Moderation behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Require channel ownership for `unbanword` (default: false).
    #[serde(default)]
    pub restrict_unban_to_owner: bool,
    /// Notice sent after each punishment; `{nick}` and `{punishment}` are substituted.
    #[serde(default = "default_notice_template")]
    pub notice_template: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            restrict_unban_to_owner: false,
            notice_template: default_notice_template(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}
