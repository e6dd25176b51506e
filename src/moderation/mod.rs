//! Banned phrase moderation: the live matcher registry and the engine
//! that turns banned words into punishments.

mod engine;
mod registry;

pub use engine::{DEFAULT_NOTICE_TEMPLATE, PunishEngine};
pub use registry::{ActiveMatcher, ActiveMatchers, RuleRegistry};
