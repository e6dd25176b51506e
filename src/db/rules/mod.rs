//! Repository for per-channel banned phrases.

mod models;
mod queries;

pub use models::Rule;
pub use queries::RuleRepository;
