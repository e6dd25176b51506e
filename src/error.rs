//! Unified error handling for the word guard.
//!
//! Store failures live in [`crate::db::DbError`]; this module layers the
//! rule/command taxonomy on top and maps each error to its chat reply.

use crate::db::DbError;
use thiserror::Error;

/// Errors raised by the rule registry and the command surface.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Lookup miss. Expected during evaluation and initialization.
    #[error("not found: {0}")]
    NotFound(String),

    /// Remove requested for a phrase with no live matcher.
    #[error("rule not found: {phrase} in {channel}")]
    RuleNotFound { phrase: String, channel: String },

    /// Malformed administrative command.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Caller is not the channel owner.
    #[error("access denied, restricted to {owner}")]
    AccessDenied { owner: String },

    /// Store connectivity or query failure.
    #[error("store error: {0}")]
    Store(DbError),
}

impl RuleError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::RuleNotFound { .. } => "rule_not_found",
            Self::Usage(_) => "usage",
            Self::AccessDenied { .. } => "access_denied",
            Self::Store(_) => "store_error",
        }
    }

    /// Convert to the chat reply shown to `nick`.
    ///
    /// Returns `None` for lookup misses, which are never replied to.
    pub fn to_reply(&self, nick: &str) -> Option<String> {
        let reply = match self {
            Self::NotFound(_) => return None,
            Self::RuleNotFound { phrase, .. } => {
                format!("{}, {} is not a banned word", nick, phrase)
            }
            Self::Usage(usage) => format!("{}, usage: {}", nick, usage),
            Self::AccessDenied { owner } => {
                format!("I'm sorry {}, that command is restricted to {}", nick, owner)
            }
            Self::Store(_) => format!("{}, something went wrong, please try again later", nick),
        };
        Some(reply)
    }
}

impl From<DbError> for RuleError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => RuleError::NotFound(what),
            other => RuleError::Store(other),
        }
    }
}

/// Result type for registry and command operations.
pub type RuleResult<T> = Result<T, RuleError>;
