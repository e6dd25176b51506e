//! Banned phrase models and key normalization.

/// Leading marker carried by channel names on the wire (`#foo`).
const CHANNEL_MARKER: char = '#';

/// A stored (channel, phrase, punishment) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Channel name without its leading marker.
    pub channel: String,
    /// Lowercased, trimmed banned phrase.
    pub phrase: String,
    /// Moderation command; `{nick}` is replaced with the offender.
    pub punishment: String,
    /// Nick that last set the rule.
    pub set_by: String,
    /// Unix timestamp of the last add/update.
    pub set_at: i64,
}

impl Rule {
    /// Normalize a phrase for storage and lookup.
    pub fn normalize_phrase(phrase: &str) -> String {
        phrase.trim().to_lowercase()
    }

    /// Normalize a channel name by stripping one leading `#`.
    ///
    /// This is also the channel owner's identity.
    pub fn normalize_channel(channel: &str) -> &str {
        let channel = channel.trim();
        channel.strip_prefix(CHANNEL_MARKER).unwrap_or(channel)
    }

    /// Render the punishment for an offender.
    pub fn format_punishment(template: &str, nick: &str) -> String {
        template.replace("{nick}", nick)
    }
}
