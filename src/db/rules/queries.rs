//! Banned phrase repository for database queries.

use super::models::Rule;
use crate::db::DbError;
use sqlx::SqlitePool;

/// Repository for banned phrase operations.
pub struct RuleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RuleRepository<'a> {
    /// Create a new rule repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the punishment template for a phrase on a channel.
    pub async fn lookup(&self, phrase: &str, channel: &str) -> Result<String, DbError> {
        let phrase = Rule::normalize_phrase(phrase);
        let channel = Rule::normalize_channel(channel);

        let row = sqlx::query_scalar::<_, String>(
            r#"
            SELECT punishcmd
            FROM badwords
            WHERE badword = ? AND channel = ?
            "#,
        )
        .bind(&phrase)
        .bind(channel)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or_else(|| DbError::NotFound(format!("{} in {}", phrase, channel)))
    }

    /// Get every rule for a channel, ordered by phrase.
    ///
    /// A channel with no rules is reported as `NotFound`.
    pub async fn lookup_channel_rules(&self, channel: &str) -> Result<Vec<Rule>, DbError> {
        let channel = Rule::normalize_channel(channel);

        let rows = sqlx::query_as::<_, (String, String, String, String, i64)>(
            r#"
            SELECT channel, badword, punishcmd, set_by, set_at
            FROM badwords
            WHERE channel = ?
            ORDER BY badword
            "#,
        )
        .bind(channel)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Err(DbError::NotFound(format!("rules for {}", channel)));
        }

        Ok(rows
            .into_iter()
            .map(|(channel, phrase, punishment, set_by, set_at)| Rule {
                channel,
                phrase,
                punishment,
                set_by,
                set_at,
            })
            .collect())
    }

    /// Add a rule, or replace the punishment of an existing one.
    pub async fn add(
        &self,
        phrase: &str,
        channel: &str,
        punishment: &str,
        set_by: &str,
    ) -> Result<(), DbError> {
        let phrase = Rule::normalize_phrase(phrase);
        let channel = Rule::normalize_channel(channel);
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO badwords (channel, badword, punishcmd, set_by, set_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (channel, badword) DO UPDATE SET
                punishcmd = excluded.punishcmd,
                set_by = excluded.set_by,
                set_at = excluded.set_at
            "#,
        )
        .bind(channel)
        .bind(&phrase)
        .bind(punishment)
        .bind(set_by)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a rule. Succeeds whether or not a row matched; the return
    /// value reports if one did.
    pub async fn remove(&self, phrase: &str, channel: &str) -> Result<bool, DbError> {
        let phrase = Rule::normalize_phrase(phrase);
        let channel = Rule::normalize_channel(channel);

        let result = sqlx::query("DELETE FROM badwords WHERE channel = ? AND badword = ?")
            .bind(channel)
            .bind(&phrase)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count rules on a channel.
    pub async fn count(&self, channel: &str) -> Result<i64, DbError> {
        let channel = Rule::normalize_channel(channel);

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM badwords WHERE channel = ?")
            .bind(channel)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
