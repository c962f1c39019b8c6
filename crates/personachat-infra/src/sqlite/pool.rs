//! SQLite connection handling for the conversation store.
//!
//! Writes are funneled through a dedicated single-connection pool while
//! reads fan out over several connections. WAL journaling lets the readers
//! proceed while a save is in flight.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const MAX_READERS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired reader/writer pools over one SQLite file.
///
/// The writer pool holds exactly one connection, so statements that mutate
/// the database never contend with each other; the reader pool serves
/// lookups and listings concurrently.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating the file if needed) and migrate the database.
    ///
    /// Migrations run on the writer connection; the readers are only
    /// opened once the schema is current.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options(database_url)?)
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(MAX_READERS)
            .connect_with(connect_options(database_url)?.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT)
        .create_if_missing(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_pool(dir: &tempfile::TempDir, name: &str) -> DatabasePool {
        let db_path = dir.path().join(name);
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_schema() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir, "schema.db").await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert!(names.contains(&"conversations"));
        assert!(names.contains(&"conversation_turns"));
    }

    #[tokio::test]
    async fn test_wal_journal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir, "wal.db").await;

        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir, "fk.db").await;

        let (enabled,): (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
