//! `unbanword` command: remove a banned phrase.

use super::BadwordCommands;
use crate::error::{RuleError, RuleResult};
use tracing::info;

const USAGE: &str = "unbanword <phrase>";

impl BadwordCommands {
    /// Handle `unbanword`.
    ///
    /// Unlike `banword`, any caller may remove a rule unless
    /// `restrict_unban_to_owner` is set.
    pub async fn handle_remove_command(
        &self,
        caller: &str,
        channel: &str,
        phrase: &str,
    ) -> RuleResult<String> {
        if self.restrict_unban_to_owner {
            Self::require_owner(caller, channel)?;
        }

        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(RuleError::Usage(USAGE));
        }

        self.registry.remove_rule(phrase, channel).await?;

        info!(phrase = %phrase, channel = %channel, by = %caller, "Banned phrase removed");
        Ok(format!("word {} has been unbanned", phrase))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::commands;
    use super::*;

    #[tokio::test]
    async fn test_remove_existing_rule() {
        let cmds = commands().await;
        cmds.handle_add_command("chan", "#chan", "spam punish /ban {nick}")
            .await
            .unwrap();

        let reply = cmds.handle_remove_command("chan", "#chan", "spam").await.unwrap();
        assert_eq!(reply, "word spam has been unbanned");
        assert!(!cmds.registry.is_active("spam", "chan").await);
    }

    #[tokio::test]
    async fn test_remove_unknown_rule() {
        let cmds = commands().await;
        let err = cmds.handle_remove_command("alice", "#chan", "ghost").await.unwrap_err();
        assert!(matches!(err, RuleError::RuleNotFound { .. }));
    }

    #[tokio::test]
    async fn test_any_caller_may_remove_by_default() {
        let cmds = commands().await;
        cmds.handle_add_command("chan", "#chan", "spam punish /ban {nick}")
            .await
            .unwrap();

        assert!(cmds.handle_remove_command("mallory", "#chan", "spam").await.is_ok());
    }

    #[tokio::test]
    async fn test_restricted_remove_requires_owner() {
        let cmds = commands().await.restrict_unban_to_owner(true);
        cmds.handle_add_command("chan", "#chan", "spam punish /ban {nick}")
            .await
            .unwrap();

        let err = cmds.handle_remove_command("mallory", "#chan", "spam").await.unwrap_err();
        assert!(matches!(err, RuleError::AccessDenied { .. }));
        assert!(cmds.registry.is_active("spam", "chan").await);
    }

    #[tokio::test]
    async fn test_empty_phrase_is_usage_error() {
        let cmds = commands().await;
        let err = cmds.handle_remove_command("chan", "#chan", "  ").await.unwrap_err();
        assert!(matches!(err, RuleError::Usage(_)));
    }
}
