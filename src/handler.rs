//! Boundary with the host bot runtime.
//!
//! The host delivers one [`ChatEvent`] per channel message and sends every
//! returned [`OutboundLine`] back to the same channel.

use crate::commands::BadwordCommands;
use crate::config::Config;
use crate::db::Database;
use crate::error::RuleResult;
use crate::moderation::{PunishEngine, RuleRegistry};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{Instrument, info, warn};

/// A chat message as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// Channel the message was said in (`#foo`).
    pub channel: String,
    /// Nick of the speaker.
    pub speaker: String,
    /// Message text.
    pub message: String,
}

impl ChatEvent {
    pub fn new(
        channel: impl Into<String>,
        speaker: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            speaker: speaker.into(),
            message: message.into(),
        }
    }
}

/// A line for the host to send to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundLine {
    /// Moderation command for the transport to execute (`/timeout alice 60`).
    Directive(String),
    /// Human-readable punishment notice.
    Notice(String),
    /// Reply to an administrative command.
    Reply(String),
}

impl OutboundLine {
    /// The raw text of the line.
    pub fn text(&self) -> &str {
        match self {
            Self::Directive(t) | Self::Notice(t) | Self::Reply(t) => t,
        }
    }
}

impl std::fmt::Display for OutboundLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Trait for chat event handlers plugged into the host.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Canonical handler name.
    fn name(&self) -> &'static str;

    /// Handle one chat event, returning the lines to send back.
    ///
    /// Failures never escape as errors. They come back as a
    /// [`OutboundLine::Reply`] addressed to the speaker.
    async fn handle(&self, event: &ChatEvent) -> Vec<OutboundLine>;
}

/// Banned phrase moderator: routes commands to [`BadwordCommands`] and
/// everything else to [`PunishEngine`].
pub struct Moderator {
    registry: Arc<RuleRegistry>,
    engine: PunishEngine,
    commands: BadwordCommands,
    command_prefix: String,
}

impl Moderator {
    /// Open the configured store and load all rules for the monitored channels.
    pub async fn open(config: &Config) -> RuleResult<Self> {
        let db = Database::new(&config.database.path).await?;
        Self::with_database(db, config).await
    }

    /// Build over an already open store and load all rules.
    pub async fn with_database(db: Database, config: &Config) -> RuleResult<Self> {
        let registry = Arc::new(RuleRegistry::new(db, config.channels.monitored()));
        registry.initialize().await?;

        let engine =
            PunishEngine::with_notice_template(registry.clone(), config.moderation.notice_template.clone());
        let commands = BadwordCommands::new(registry.clone())
            .restrict_unban_to_owner(config.moderation.restrict_unban_to_owner);

        info!(
            bot = %config.bot.nick,
            channels = registry.channels().len(),
            "Moderator ready"
        );

        Ok(Self {
            registry,
            engine,
            commands,
            command_prefix: config.bot.command_prefix.clone(),
        })
    }

    /// The live rule registry.
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Release the store. Called once at shutdown.
    pub async fn shutdown(&self) {
        self.registry.finalize().await;
    }

    /// Split `!command args` into a known command name and its arguments.
    fn parse_command<'a>(&self, message: &'a str) -> Option<(&'a str, &'a str)> {
        let rest = message.trim_start().strip_prefix(self.command_prefix.as_str())?;
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        BadwordCommands::handles(name).then_some((name, args))
    }
}

#[async_trait]
impl Handler for Moderator {
    fn name(&self) -> &'static str {
        "wordguard"
    }

    async fn handle(&self, event: &ChatEvent) -> Vec<OutboundLine> {
        let span = crate::telemetry::spans::event(&event.channel, &event.speaker);

        async {
            if let Some((name, args)) = self.parse_command(&event.message) {
                return self.commands.handle(&event.speaker, &event.channel, name, args).await;
            }

            match self
                .engine
                .evaluate(&event.channel, &event.speaker, &event.message)
                .await
            {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), "Evaluation failed");
                    e.to_reply(&event.speaker)
                        .map(OutboundLine::Reply)
                        .into_iter()
                        .collect()
                }
            }
        }
        .instrument(span)
        .await
    }
}
