//! Database module for persistent storage.
//!
//! Provides async SQLite access using SQLx for the per-channel banned
//! phrase table. The pool is capped at a single connection, so every
//! statement is serialized and each write commits on its own.

mod rules;

pub use rules::{Rule, RuleRepository};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// True for lookup misses, which callers use for control flow.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - prevents a wedged writer from blocking forever.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connections are recycled after this long.
    const MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

    /// Open the database, running migrations if needed.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let options = if path == ":memory:" {
            // Uniquely named shared-cache memory database per call.
            // `file::memory:` is global-ish and will collide across parallel tests.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:wordguard-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true)
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        };

        // One connection serializes writers. A memory database lives only as
        // long as its connection, so that one is never reaped.
        let (idle_timeout, max_lifetime) = if path == ":memory:" {
            (None, None)
        } else {
            (Some(Self::IDLE_TIMEOUT), Some(Self::MAX_LIFETIME))
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .idle_timeout(idle_timeout)
            .max_lifetime(max_lifetime)
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        info!(path = %path, "Database connected");

        Self::run_migrations(&pool).await?;

        if path != ":memory:" {
            sqlx::query("PRAGMA journal_mode=WAL")
                .execute(&pool)
                .await?;
        }

        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&pool)
            .await?;

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            return Err(DbError::Internal(format!(
                "integrity check failed: {}",
                integrity_result
            )));
        }

        Ok(Self { pool })
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database migrations checked/applied");
        Ok(())
    }

    /// Get the banned phrase repository.
    pub fn rules(&self) -> RuleRepository<'_> {
        RuleRepository::new(&self.pool)
    }

    /// Close the pool. Later queries fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_databases_are_isolated() {
        let a = Database::new(":memory:").await.unwrap();
        let b = Database::new(":memory:").await.unwrap();

        a.rules().add("spam", "foo", "/timeout {nick} 60", "foo").await.unwrap();

        assert!(a.rules().lookup("spam", "foo").await.is_ok());
        assert!(b.rules().lookup("spam", "foo").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_close_marks_pool_closed() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(!db.is_closed());
        db.close().await;
        assert!(db.is_closed());
        assert!(db.rules().lookup("spam", "foo").await.is_err());
    }

    #[tokio::test]
    async fn test_file_database_persists_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wordguard.db");
        let path = path.to_str().unwrap().to_string();

        let db = Database::new(&path).await.unwrap();
        db.rules().add("spam", "foo", "/ban {nick}", "foo").await.unwrap();
        db.close().await;

        let reopened = Database::new(&path).await.unwrap();
        assert_eq!(reopened.rules().lookup("SPAM", "foo").await.unwrap(), "/ban {nick}");
    }
}
