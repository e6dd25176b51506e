//! wordguard - banned phrase moderation over a line-based host shim.
//!
//! Reads chat events from stdin as `<#channel> <nick> <message...>` and
//! writes every output line to stdout as `<#channel> <line>`.

use slirc_wordguard::config::{Config, LogFormat};
use slirc_wordguard::handler::{ChatEvent, Handler, Moderator};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "wordguard.toml".to_string());

    let config = Config::load_validated(&config_path)?;

    init_tracing(config.logging.format);

    info!(
        config = %config_path,
        bot = %config.bot.nick,
        database = %config.database.path,
        "Starting wordguard"
    );

    let moderator = Moderator::open(&config).await.map_err(|e| {
        error!(error = %e, "Failed to open rule store");
        e
    })?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        };

        let Some(line) = line else {
            info!("End of input, shutting down");
            break;
        };

        let Some(event) = parse_event(&line) else {
            if !line.trim().is_empty() {
                warn!(line = %line, "Ignoring malformed event line");
            }
            continue;
        };

        for out in moderator.handle(&event).await {
            stdout
                .write_all(format!("{} {}\n", event.channel, out).as_bytes())
                .await?;
        }
        stdout.flush().await?;
    }

    moderator.shutdown().await;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Parse `<#channel> <nick> <message...>`.
fn parse_event(line: &str) -> Option<ChatEvent> {
    let mut parts = line.trim().splitn(3, char::is_whitespace);
    let channel = parts.next().filter(|c| c.starts_with('#') && c.len() > 1)?;
    let speaker = parts.next().filter(|s| !s.is_empty())?;
    let message = parts.next().unwrap_or("").trim_start();
    Some(ChatEvent::new(channel, speaker, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event() {
        let event = parse_event("#foo alice you are badword").unwrap();
        assert_eq!(event, ChatEvent::new("#foo", "alice", "you are badword"));

        let event = parse_event("#foo alice").unwrap();
        assert_eq!(event.message, "");

        assert!(parse_event("foo alice hi").is_none());
        assert!(parse_event("#foo").is_none());
        assert!(parse_event("").is_none());
    }
}
