//! Telemetry utilities for command timing and event correlation.

use std::time::Instant;
use tracing::debug;

/// Guard for timing command execution.
///
/// Logs command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        debug!(command = %self.command, elapsed_ms, "Command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one inbound chat event.
    pub fn event(channel: &str, speaker: &str) -> Span {
        info_span!("event", channel = %channel, speaker = %speaker)
    }

    /// Create a span for an administrative command.
    pub fn command(name: &str, caller: &str, channel: &str) -> Span {
        info_span!("command", name = %name, caller = %caller, channel = %channel)
    }
}
