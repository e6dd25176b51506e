//! slirc-wordguard - per-channel banned phrase moderation.
//!
//! Stores "banned phrase -> punishment command" rules per channel in
//! SQLite, keeps a live matcher for each, and turns banned words in chat
//! into punishment directives for the host bot to send.
//!
//! ```rust,no_run
//! use slirc_wordguard::config::Config;
//! use slirc_wordguard::handler::{ChatEvent, Handler, Moderator};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load_validated("wordguard.toml")?;
//! let moderator = Moderator::open(&config).await?;
//!
//! for line in moderator.handle(&ChatEvent::new("#foo", "alice", "hello")).await {
//!     println!("{}", line);
//! }
//!
//! moderator.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod moderation;
pub mod telemetry;
