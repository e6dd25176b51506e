//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use crate::moderation::DEFAULT_NOTICE_TEMPLATE;

pub fn default_bot_nick() -> String {
    "wordguard".to_string()
}

pub fn default_command_prefix() -> String {
    "!".to_string()
}

pub fn default_database_path() -> String {
    "wordguard.db".to_string()
}

pub fn default_notice_template() -> String {
    DEFAULT_NOTICE_TEMPLATE.to_string()
}
