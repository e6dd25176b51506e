//! Live registry of banned phrase matchers.
//!
//! Mirrors the `badwords` table for the monitored channels. Every add and
//! remove goes through the store first, with the registry lock held, so the
//! matcher set and the table change together.
//!
//! # Known gap
//!
//! `remove_rule` checks for a live matcher before touching the store. If
//! the store delete then fails, the matcher stays installed and the error
//! is returned; the rule is still in the table, so the two stay in step.

use crate::db::{Database, Rule};
use crate::error::{RuleError, RuleResult};
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

/// Index key for a matcher: normalized channel and phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MatcherKey {
    channel: String,
    phrase: String,
}

impl MatcherKey {
    fn new(phrase: &str, channel: &str) -> Self {
        Self {
            channel: Rule::normalize_channel(channel).to_string(),
            phrase: Rule::normalize_phrase(phrase),
        }
    }
}

/// In-memory projection of a stored rule.
#[derive(Debug, Clone)]
pub struct ActiveMatcher {
    /// Normalized phrase.
    pub phrase: String,
    /// Channel without its leading marker.
    pub channel: String,
}

/// Registry of active matchers, keyed by (channel, phrase).
pub struct RuleRegistry {
    db: Database,
    /// Monitored channels, normalized.
    channels: Vec<String>,
    matchers: RwLock<HashMap<MatcherKey, ActiveMatcher>>,
}

impl RuleRegistry {
    /// Create an empty registry over `db` for the given monitored channels.
    pub fn new<I, S>(db: Database, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for channel in channels {
            let channel = Rule::normalize_channel(channel.as_ref());
            if !channel.is_empty() && !normalized.iter().any(|c| c == channel) {
                normalized.push(channel.to_string());
            }
        }

        Self {
            db,
            channels: normalized,
            matchers: RwLock::new(HashMap::new()),
        }
    }

    /// Store handle backing this registry.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Monitored channels, normalized.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Install one matcher per stored rule on every monitored channel.
    ///
    /// A channel without rules is logged and skipped. Returns the number
    /// of matchers installed.
    pub async fn initialize(&self) -> RuleResult<usize> {
        let mut matchers = self.matchers.write().await;
        let mut installed = 0;

        for channel in &self.channels {
            match self.db.rules().lookup_channel_rules(channel).await {
                Ok(rules) => {
                    info!(channel = %channel, count = rules.len(), "Setting up banned phrase matchers");
                    for rule in rules {
                        Self::install(&mut matchers, &rule.phrase, &rule.channel);
                        installed += 1;
                    }
                }
                Err(e) if e.is_not_found() => {
                    info!(channel = %channel, "No banned phrases found for channel");
                }
                Err(e) => {
                    warn!(channel = %channel, error = %e, "Failed to load banned phrases");
                    return Err(e.into());
                }
            }
        }

        info!(matchers = installed, channels = self.channels.len(), "Rule registry initialized");
        Ok(installed)
    }

    /// Store a rule and install (or replace) its matcher.
    pub async fn add_rule(
        &self,
        phrase: &str,
        channel: &str,
        punishment: &str,
        set_by: &str,
    ) -> RuleResult<()> {
        let key = MatcherKey::new(phrase, channel);
        let mut matchers = self.matchers.write().await;

        info!(phrase = %key.phrase, channel = %key.channel, "Adding banned phrase to the database");
        self.db.rules().add(phrase, channel, punishment, set_by).await?;

        Self::install(&mut matchers, &key.phrase, &key.channel);
        info!(phrase = %key.phrase, channel = %key.channel, "Added matcher");
        Ok(())
    }

    /// Delete a rule and uninstall its matcher.
    ///
    /// Fails with `RuleNotFound`, leaving the store untouched, when no
    /// matcher is installed for the pair.
    pub async fn remove_rule(&self, phrase: &str, channel: &str) -> RuleResult<()> {
        let key = MatcherKey::new(phrase, channel);
        let mut matchers = self.matchers.write().await;

        if !matchers.contains_key(&key) {
            return Err(RuleError::RuleNotFound {
                phrase: key.phrase,
                channel: key.channel,
            });
        }

        info!(phrase = %key.phrase, channel = %key.channel, "Removing banned phrase from the database");
        let deleted = self.db.rules().remove(&key.phrase, &key.channel).await?;
        if !deleted {
            warn!(phrase = %key.phrase, channel = %key.channel, "Matcher had no stored rule");
        }

        matchers.remove(&key);
        info!(phrase = %key.phrase, channel = %key.channel, "Removed matcher");
        Ok(())
    }

    /// Take a read view of the matcher set.
    ///
    /// Adds and removes wait until the view is dropped.
    pub async fn matchers(&self) -> ActiveMatchers<'_> {
        ActiveMatchers {
            guard: self.matchers.read().await,
        }
    }

    /// Whether a matcher is installed for the pair.
    pub async fn is_active(&self, phrase: &str, channel: &str) -> bool {
        self.matchers().await.contains(phrase, channel)
    }

    /// Number of matchers installed on a channel.
    pub async fn active_count(&self, channel: &str) -> usize {
        self.matchers().await.phrases(channel).len()
    }

    /// Sorted phrases with live matchers on a channel.
    pub async fn active_phrases(&self, channel: &str) -> Vec<String> {
        self.matchers().await.phrases(channel)
    }

    /// Release the store handle. Called once at shutdown.
    pub async fn finalize(&self) {
        let count = self.matchers.read().await.len();
        debug!(matchers = count, "Finalizing rule registry");
        self.db.close().await;
    }

    fn install(matchers: &mut HashMap<MatcherKey, ActiveMatcher>, phrase: &str, channel: &str) {
        let key = MatcherKey::new(phrase, channel);
        let matcher = ActiveMatcher {
            phrase: key.phrase.clone(),
            channel: key.channel.clone(),
        };
        if matchers.insert(key, matcher).is_some() {
            debug!(phrase = %phrase, channel = %channel, "Replaced existing matcher");
        }
    }
}

/// Read view over the active matchers.
pub struct ActiveMatchers<'a> {
    guard: RwLockReadGuard<'a, HashMap<MatcherKey, ActiveMatcher>>,
}

impl ActiveMatchers<'_> {
    /// Whether a matcher is installed for the pair.
    pub fn contains(&self, phrase: &str, channel: &str) -> bool {
        self.guard.contains_key(&MatcherKey::new(phrase, channel))
    }

    /// Whether any matcher on `channel` has its phrase inside `message`.
    pub fn fires(&self, channel: &str, message: &str) -> bool {
        let channel = Rule::normalize_channel(channel);
        let lowered = message.to_lowercase();
        self.guard
            .values()
            .any(|m| m.channel == channel && lowered.contains(&m.phrase))
    }

    /// Sorted phrases with live matchers on a channel.
    pub fn phrases(&self, channel: &str) -> Vec<String> {
        let channel = Rule::normalize_channel(channel);
        let mut phrases: Vec<String> = self
            .guard
            .values()
            .filter(|m| m.channel == channel)
            .map(|m| m.phrase.clone())
            .collect();
        phrases.sort();
        phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn registry(channels: &[&str]) -> RuleRegistry {
        let db = Database::new(":memory:").await.unwrap();
        RuleRegistry::new(db, channels.iter().copied())
    }

    #[tokio::test]
    async fn test_channels_are_normalized_and_deduplicated() {
        let reg = registry(&["#foo", "foo", "#bar", ""]).await;
        assert_eq!(reg.channels(), &["foo".to_string(), "bar".to_string()]);
    }

    #[tokio::test]
    async fn test_initialize_replays_stored_rules() {
        let reg = registry(&["#foo", "#empty"]).await;
        reg.db().rules().add("spam", "foo", "/ban {nick}", "foo").await.unwrap();
        reg.db().rules().add("eggs", "foo", "/timeout {nick} 5", "foo").await.unwrap();
        reg.db().rules().add("elsewhere", "unmonitored", "/ban {nick}", "x").await.unwrap();

        assert_eq!(reg.initialize().await.unwrap(), 2);
        assert_eq!(reg.active_phrases("#foo").await, vec!["eggs", "spam"]);
        assert_eq!(reg.active_count("empty").await, 0);
        assert!(!reg.is_active("elsewhere", "unmonitored").await);
    }

    #[tokio::test]
    async fn test_add_rule_is_idempotent() {
        let reg = registry(&["#foo"]).await;
        reg.add_rule("Spam", "#foo", "/timeout {nick} 1", "foo").await.unwrap();
        reg.add_rule("spam ", "#foo", "/timeout {nick} 2", "foo").await.unwrap();

        assert_eq!(reg.active_count("foo").await, 1);
        assert_eq!(reg.db().rules().lookup("spam", "foo").await.unwrap(), "/timeout {nick} 2");
    }

    #[tokio::test]
    async fn test_remove_rule_without_matcher_leaves_store_untouched() {
        let reg = registry(&["#foo"]).await;
        // Stored behind the registry's back, so no matcher exists.
        reg.db().rules().add("spam", "foo", "/ban {nick}", "foo").await.unwrap();

        let err = reg.remove_rule("spam", "#foo").await.unwrap_err();
        assert!(matches!(err, RuleError::RuleNotFound { .. }));
        assert!(reg.db().rules().lookup("spam", "foo").await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_rule_is_scoped_to_channel() {
        let reg = registry(&["#foo", "#bar"]).await;
        reg.add_rule("spam", "#foo", "/ban {nick}", "foo").await.unwrap();

        let err = reg.remove_rule("spam", "#bar").await.unwrap_err();
        assert!(matches!(err, RuleError::RuleNotFound { .. }));
        assert!(reg.is_active("spam", "foo").await);
    }

    #[tokio::test]
    async fn test_remove_rule_clears_store_and_matcher() {
        let reg = registry(&["#foo"]).await;
        reg.add_rule("spam", "#foo", "/ban {nick}", "foo").await.unwrap();

        reg.remove_rule("SPAM", "#foo").await.unwrap();
        assert!(!reg.is_active("spam", "foo").await);
        assert!(reg.db().rules().lookup("spam", "foo").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_store_failure_keeps_matcher() {
        let reg = registry(&["#foo"]).await;
        reg.add_rule("spam", "#foo", "/ban {nick}", "foo").await.unwrap();
        reg.db().close().await;

        let err = reg.remove_rule("spam", "#foo").await.unwrap_err();
        assert!(matches!(err, RuleError::Store(_)));
        assert!(reg.is_active("spam", "foo").await);
    }

    #[tokio::test]
    async fn test_fires_on_contained_phrase() {
        let reg = registry(&["#foo"]).await;
        reg.add_rule("spam", "#foo", "/ban {nick}", "foo").await.unwrap();

        let view = reg.matchers().await;
        assert!(view.fires("#foo", "buy SPAM now"));
        assert!(!view.fires("#foo", "clean message"));
        assert!(!view.fires("#bar", "buy spam now"));
    }
}
