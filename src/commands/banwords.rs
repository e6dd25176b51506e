//! `banwords` command: list a channel's banned phrases.

use super::BadwordCommands;
use crate::db::Rule;
use crate::error::RuleResult;
use tracing::warn;

impl BadwordCommands {
    /// Handle `banwords`. Owner only.
    pub async fn handle_list_command(&self, caller: &str, channel: &str) -> RuleResult<Vec<String>> {
        Self::require_owner(caller, channel)?;
        let owner = Rule::normalize_channel(channel);

        let rules = match self.registry.db().rules().lookup_channel_rules(channel).await {
            Ok(rules) => rules,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        if rules.is_empty() {
            return Ok(vec![format!("No banned words for {}", owner)]);
        }

        let active = self.registry.matchers().await;
        let mut texts = vec![format!("Banned words for {}:", owner)];
        for rule in &rules {
            if !active.contains(&rule.phrase, owner) {
                warn!(phrase = %rule.phrase, channel = %owner, "Stored rule has no active matcher");
            }
            texts.push(format!("{} -> {}", rule.phrase, rule.punishment));
        }
        texts.push(format!("End of banned words for {}", owner));

        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::commands;
    use crate::error::RuleError;

    #[tokio::test]
    async fn test_list_empty_channel() {
        let cmds = commands().await;
        let texts = cmds.handle_list_command("chan", "#chan").await.unwrap();
        assert_eq!(texts, vec!["No banned words for chan"]);
    }

    #[tokio::test]
    async fn test_list_rules_in_phrase_order() {
        let cmds = commands().await;
        cmds.handle_add_command("chan", "#chan", "zebra punish /ban {nick}")
            .await
            .unwrap();
        cmds.handle_add_command("chan", "#chan", "apple punish /timeout {nick} 5")
            .await
            .unwrap();

        let texts = cmds.handle_list_command("chan", "#chan").await.unwrap();
        assert_eq!(
            texts,
            vec![
                "Banned words for chan:",
                "apple -> /timeout {nick} 5",
                "zebra -> /ban {nick}",
                "End of banned words for chan",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_is_owner_only() {
        let cmds = commands().await;
        let err = cmds.handle_list_command("mallory", "#chan").await.unwrap_err();
        assert!(matches!(err, RuleError::AccessDenied { .. }));
    }
}
