//! Administrative commands for banned phrases.
//!
//! - `banword <phrase> punish <command>`: add or update a rule (owner only)
//! - `unbanword <phrase>`: remove a rule
//! - `banwords`: list the channel's rules (owner only)

mod banword;
mod banwords;
mod unbanword;

use crate::db::Rule;
use crate::error::{RuleError, RuleResult};
use crate::handler::OutboundLine;
use crate::moderation::RuleRegistry;
use crate::telemetry::CommandTimer;
use std::sync::Arc;
use tracing::{Instrument, warn};

pub use banword::split_punishment;

/// Names of the commands this surface answers to.
pub const COMMAND_NAMES: &[&str] = &["banword", "unbanword", "banwords"];

/// Command surface over the rule registry.
pub struct BadwordCommands {
    registry: Arc<RuleRegistry>,
    restrict_unban_to_owner: bool,
}

impl BadwordCommands {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            restrict_unban_to_owner: false,
        }
    }

    /// Require channel ownership for `unbanword` as well.
    pub fn restrict_unban_to_owner(mut self, restrict: bool) -> Self {
        self.restrict_unban_to_owner = restrict;
        self
    }

    /// Whether `name` is one of this surface's commands.
    pub fn handles(name: &str) -> bool {
        COMMAND_NAMES.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Dispatch a command and turn the outcome into chat replies.
    ///
    /// Every failure yields a reply; nothing is dropped.
    pub async fn handle(
        &self,
        caller: &str,
        channel: &str,
        command: &str,
        args: &str,
    ) -> Vec<OutboundLine> {
        let command = command.to_lowercase();
        let span = crate::telemetry::spans::command(&command, caller, channel);

        async {
            let _timer = CommandTimer::new(command.as_str());

            let result = match command.as_str() {
                "banword" => self.handle_add_command(caller, channel, args).await.map(|r| vec![r]),
                "unbanword" => self.handle_remove_command(caller, channel, args).await.map(|r| vec![r]),
                "banwords" => self.handle_list_command(caller, channel).await,
                _ => return Vec::new(),
            };

            match result {
                Ok(replies) => replies.into_iter().map(OutboundLine::Reply).collect(),
                Err(e) => {
                    if matches!(e, RuleError::Store(_)) {
                        warn!(error = %e, code = e.error_code(), "Command failed");
                    }
                    Self::reply_for(caller, e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Chat reply for a failed command.
    fn reply_for(caller: &str, err: RuleError) -> Vec<OutboundLine> {
        // NotFound has no reply of its own; surface it as a generic failure.
        let text = err
            .to_reply(caller)
            .unwrap_or_else(|| format!("{}, something went wrong, please try again later", caller));
        vec![OutboundLine::Reply(text)]
    }

    /// Fail with `AccessDenied` unless `caller` owns `channel`.
    fn require_owner(caller: &str, channel: &str) -> RuleResult<()> {
        let owner = Rule::normalize_channel(channel);
        if caller == owner {
            Ok(())
        } else {
            Err(RuleError::AccessDenied {
                owner: owner.to_string(),
            })
        }
    }
}
