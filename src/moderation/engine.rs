//! Match/punish engine.
//!
//! Scans a chat message word by word and turns every banned word into a
//! punishment directive followed by a notice naming the offender.

use super::registry::RuleRegistry;
use crate::db::Rule;
use crate::error::RuleResult;
use crate::handler::OutboundLine;
use std::sync::Arc;
use tracing::{info, warn};

/// Default notice sent after a punishment.
pub const DEFAULT_NOTICE_TEMPLATE: &str = "Hey, {nick}, enjoy your punishment ({punishment})";

/// Evaluates chat messages against the registered rules.
pub struct PunishEngine {
    registry: Arc<RuleRegistry>,
    notice_template: String,
}

impl PunishEngine {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self::with_notice_template(registry, DEFAULT_NOTICE_TEMPLATE)
    }

    pub fn with_notice_template(registry: Arc<RuleRegistry>, notice_template: impl Into<String>) -> Self {
        Self {
            registry,
            notice_template: notice_template.into(),
        }
    }

    /// Evaluate one message.
    ///
    /// The channel owner never triggers their own rules. Each word is
    /// looked up on its own, in message order; repeated banned words each
    /// produce their own directive/notice pair.
    pub async fn evaluate(
        &self,
        channel: &str,
        speaker: &str,
        message: &str,
    ) -> RuleResult<Vec<OutboundLine>> {
        let owner = Rule::normalize_channel(channel);
        if speaker == owner {
            return Ok(Vec::new());
        }

        let active = self.registry.matchers().await;
        if !active.fires(owner, message) {
            return Ok(Vec::new());
        }

        let mut lines = Vec::new();
        for word in message.split_whitespace() {
            let template = match self.registry.db().rules().lookup(word, owner).await {
                Ok(template) => template,
                Err(e) if e.is_not_found() => continue,
                Err(e) => {
                    warn!(channel = %owner, error = %e, "Rule lookup failed during evaluation");
                    return Err(e.into());
                }
            };

            if !active.contains(word, owner) {
                warn!(channel = %owner, word = %word, "Stored rule has no active matcher, skipping");
                continue;
            }

            let punishment = Rule::format_punishment(&template, speaker);
            info!(channel = %owner, nick = %speaker, punishment = %punishment, "Punishing banned word");

            let notice = self.render_notice(speaker, &punishment);
            lines.push(OutboundLine::Directive(punishment));
            lines.push(OutboundLine::Notice(notice));
        }

        Ok(lines)
    }

    fn render_notice(&self, nick: &str, punishment: &str) -> String {
        render_template(
            &self.notice_template,
            &[("{nick}", nick), ("{punishment}", punishment)],
        )
    }
}

/// Substitute placeholders in a single left-to-right pass.
///
/// Substituted text is never rescanned, so a value that itself looks like
/// a placeholder is copied through unchanged.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
