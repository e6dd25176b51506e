//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and TOML loading
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup checks that report every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{
    BotConfig, ChannelsConfig, Config, ConfigError, DatabaseConfig, LogFormat, LoggingConfig,
    ModerationConfig,
};
pub use validation::{ValidationError, validate};
