//! `banword` command: add or update a banned phrase.

use super::BadwordCommands;
use crate::error::{RuleError, RuleResult};
use tracing::{info, warn};

const SEPARATOR: &str = "punish";
const USAGE: &str = "banword <phrase> punish <command>, {nick} is replaced with the offender";

/// Split `<phrase> punish <command>` on the separator word.
///
/// The separator must appear exactly once as a whitespace-delimited word,
/// and both sides must be non-empty after trimming.
pub fn split_punishment(raw: &str) -> Option<(&str, &str)> {
    let mut found = None;

    for (idx, _) in raw.match_indices(SEPARATOR) {
        let end = idx + SEPARATOR.len();
        let starts_word = raw[..idx].chars().next_back().is_none_or(char::is_whitespace);
        let ends_word = raw[end..].chars().next().is_none_or(char::is_whitespace);
        if !(starts_word && ends_word) {
            continue;
        }
        if found.is_some() {
            return None;
        }
        found = Some((idx, end));
    }

    let (idx, end) = found?;
    let phrase = raw[..idx].trim();
    let punishment = raw[end..].trim();
    if phrase.is_empty() || punishment.is_empty() {
        return None;
    }
    Some((phrase, punishment))
}

impl BadwordCommands {
    /// Handle `banword`. Only the channel owner may add rules.
    pub async fn handle_add_command(
        &self,
        caller: &str,
        channel: &str,
        raw_args: &str,
    ) -> RuleResult<String> {
        Self::require_owner(caller, channel)?;

        let (phrase, punishment) = split_punishment(raw_args).ok_or(RuleError::Usage(USAGE))?;

        if phrase.split_whitespace().nth(1).is_some() {
            // Messages are matched word by word.
            warn!(phrase = %phrase, channel = %channel, "Multi-word phrase can never match a single word");
        }

        self.registry.add_rule(phrase, channel, punishment, caller).await?;

        info!(phrase = %phrase, channel = %channel, by = %caller, "Banned phrase configured");
        Ok(format!("{}, your bad word has been configured", caller))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::commands;
    use super::*;

    #[test]
    fn test_split_punishment() {
        assert_eq!(
            split_punishment("badword punish /timeout {nick} 60"),
            Some(("badword", "/timeout {nick} 60"))
        );
        assert_eq!(
            split_punishment("  something bad   punish  /ban {nick} "),
            Some(("something bad", "/ban {nick}"))
        );
    }

    #[test]
    fn test_split_ignores_separator_inside_words() {
        assert_eq!(
            split_punishment("spam punish /timeout {nick} 60 punishment"),
            Some(("spam", "/timeout {nick} 60 punishment"))
        );
        assert_eq!(split_punishment("unpunished punish /ban {nick}"), Some(("unpunished", "/ban {nick}")));
    }

    #[test]
    fn test_split_rejects_malformed() {
        assert_eq!(split_punishment("no separator here"), None);
        assert_eq!(split_punishment("punish /ban {nick}"), None);
        assert_eq!(split_punishment("spam punish"), None);
        assert_eq!(split_punishment("a punish b punish c"), None);
        assert_eq!(split_punishment(""), None);
    }

    #[tokio::test]
    async fn test_owner_adds_rule() {
        let cmds = commands().await;
        let reply = cmds
            .handle_add_command("chan", "#chan", "BadWord punish /timeout {nick} 60")
            .await
            .unwrap();

        assert_eq!(reply, "chan, your bad word has been configured");
        assert!(cmds.registry.is_active("badword", "chan").await);
        assert_eq!(
            cmds.registry.db().rules().lookup("badword", "#chan").await.unwrap(),
            "/timeout {nick} 60"
        );
    }

    #[tokio::test]
    async fn test_non_owner_is_denied_and_store_unchanged() {
        let cmds = commands().await;
        let err = cmds
            .handle_add_command("mallory", "#chan", "x punish y")
            .await
            .unwrap_err();

        assert!(matches!(err, RuleError::AccessDenied { .. }));
        assert!(cmds.registry.db().rules().lookup("x", "#chan").await.unwrap_err().is_not_found());
        assert!(!cmds.registry.is_active("x", "chan").await);
    }

    #[tokio::test]
    async fn test_usage_error_leaves_state_alone() {
        let cmds = commands().await;
        let err = cmds.handle_add_command("chan", "#chan", "just words").await.unwrap_err();

        assert!(matches!(err, RuleError::Usage(_)));
        assert_eq!(cmds.registry.active_count("chan").await, 0);
    }
}
