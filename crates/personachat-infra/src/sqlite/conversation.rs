//! SQLite conversation store implementation.
//!
//! Implements `ConversationStore` from `personachat-core` using sqlx with
//! split read/write pools. Raw queries, private Row structs for
//! SQLite-to-domain mapping, rfc3339 datetimes.
//!
//! Persist is one transaction on the writer pool: upsert the conversation
//! row, delete prior turns, insert the snapshot turns. A re-save therefore
//! overwrites the previous record atomically.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use personachat_core::store::ConversationStore;
use personachat_types::conversation::{ConversationRecord, RecordSummary};
use personachat_types::error::StoreError;
use personachat_types::turn::{Turn, TurnRole};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationStore`.
pub struct SqliteConversationStore {
    pool: DatabasePool,
}

impl SqliteConversationStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    persona_key: String,
    saved_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            persona_key: row.try_get("persona_key")?,
            saved_at: row.try_get("saved_at")?,
        })
    }
}

struct TurnRow {
    role: String,
    content: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, StoreError> {
        let role: TurnRole = self
            .role
            .parse()
            .map_err(|e: String| StoreError::Query(e))?;
        Ok(Turn {
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn parse_uuid(s: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(s).map_err(|e| StoreError::Query(format!("invalid record id: {e}")))
}

fn io_err(e: sqlx::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

// ---------------------------------------------------------------------------
// ConversationStore implementation
// ---------------------------------------------------------------------------

impl ConversationStore for SqliteConversationStore {
    async fn persist(&self, record: &ConversationRecord) -> Result<Uuid, StoreError> {
        let mut tx = self.pool.writer.begin().await.map_err(io_err)?;

        sqlx::query(
            r#"INSERT INTO conversations (id, persona_key, saved_at)
               VALUES (?, ?, ?)
               ON CONFLICT (id) DO UPDATE SET
                   persona_key = excluded.persona_key,
                   saved_at = excluded.saved_at"#,
        )
        .bind(record.id.to_string())
        .bind(&record.persona_key)
        .bind(record.saved_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(io_err)?;

        sqlx::query("DELETE FROM conversation_turns WHERE conversation_id = ?")
            .bind(record.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(io_err)?;

        for (seq, turn) in record.turns.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO conversation_turns (conversation_id, seq, role, content, created_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(record.id.to_string())
            .bind(seq as i64)
            .bind(turn.role.to_string())
            .bind(&turn.content)
            .bind(turn.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(io_err)?;
        }

        tx.commit().await.map_err(io_err)?;
        Ok(record.id)
    }

    async fn get(&self, record_id: &Uuid) -> Result<ConversationRecord, StoreError> {
        let row = sqlx::query("SELECT id, persona_key, saved_at FROM conversations WHERE id = ?")
            .bind(record_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(io_err)?
            .ok_or(StoreError::NotFound)?;

        let conv = ConversationRow::from_row(&row).map_err(io_err)?;

        let turn_rows = sqlx::query(
            r#"SELECT role, content, created_at
               FROM conversation_turns
               WHERE conversation_id = ?
               ORDER BY seq ASC"#,
        )
        .bind(record_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(io_err)?;

        let turns = turn_rows
            .iter()
            .map(|r| TurnRow::from_row(r).map_err(io_err)?.into_turn())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ConversationRecord {
            id: parse_uuid(&conv.id)?,
            persona_key: conv.persona_key,
            turns,
            saved_at: parse_datetime(&conv.saved_at)?,
        })
    }

    async fn list(&self) -> Result<Vec<RecordSummary>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT c.id, c.persona_key, c.saved_at,
                      (SELECT COUNT(*) FROM conversation_turns t
                       WHERE t.conversation_id = c.id) AS turn_count
               FROM conversations c
               ORDER BY c.saved_at DESC"#,
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(io_err)?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(io_err)?;
                let persona_key: String = row.try_get("persona_key").map_err(io_err)?;
                let saved_at: String = row.try_get("saved_at").map_err(io_err)?;
                let turn_count: i64 = row.try_get("turn_count").map_err(io_err)?;
                Ok(RecordSummary {
                    id: parse_uuid(&id)?,
                    persona_key,
                    turn_count: turn_count as u32,
                    saved_at: parse_datetime(&saved_at)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn store() -> (tempfile::TempDir, SqliteConversationStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteConversationStore::new(pool))
    }

    fn record(id: Uuid, questions: &[&str]) -> ConversationRecord {
        let mut turns = vec![Turn::now(TurnRole::System, "You are an analyst.")];
        for q in questions {
            turns.push(Turn::now(TurnRole::User, *q));
            turns.push(Turn::now(TurnRole::Assistant, format!("answer to {q}")));
        }
        ConversationRecord {
            id,
            persona_key: "analyst".to_string(),
            turns,
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_persist_get_round_trip() {
        let (_dir, store) = store().await;
        let id = Uuid::now_v7();
        let rec = record(id, &["q1", "q2"]);

        let record_id = store.persist(&rec).await.unwrap();
        assert_eq!(record_id, id);

        let loaded = store.get(&id).await.unwrap();
        assert_eq!(loaded.persona_key, "analyst");
        assert_eq!(loaded.turns.len(), 5);
        assert_eq!(loaded.turns[0].role, TurnRole::System);
        assert_eq!(loaded.turns[1].content, "q1");
        assert_eq!(loaded.turns[4].content, "answer to q2");
    }

    #[tokio::test]
    async fn test_get_unknown_record_not_found() {
        let (_dir, store) = store().await;
        let err = store.get(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_re_save_overwrites_single_record() {
        let (_dir, store) = store().await;
        let id = Uuid::now_v7();

        store.persist(&record(id, &["q1"])).await.unwrap();
        store.persist(&record(id, &["q1", "q2", "q3"])).await.unwrap();

        let loaded = store.get(&id).await.unwrap();
        assert_eq!(loaded.turns.len(), 7);

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 1, "re-save must not create a second record");
        assert_eq!(summaries[0].turn_count, 7);
    }

    #[tokio::test]
    async fn test_list_newest_first_without_bodies() {
        let (_dir, store) = store().await;

        let old_id = Uuid::now_v7();
        let mut old = record(old_id, &["q"]);
        old.saved_at = Utc::now() - chrono::Duration::hours(1);
        store.persist(&old).await.unwrap();

        let new_id = Uuid::now_v7();
        store.persist(&record(new_id, &["q1", "q2"])).await.unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, new_id);
        assert_eq!(summaries[1].id, old_id);
        assert_eq!(summaries[0].turn_count, 5);
    }

    #[tokio::test]
    async fn test_turn_order_is_seq_not_timestamp() {
        let (_dir, store) = store().await;
        let id = Uuid::now_v7();

        // Timestamps deliberately reversed relative to append order.
        let base = Utc::now();
        let turns = vec![
            Turn {
                role: TurnRole::System,
                content: "prompt".to_string(),
                created_at: base,
            },
            Turn {
                role: TurnRole::User,
                content: "asked second, stamped later".to_string(),
                created_at: base + chrono::Duration::seconds(10),
            },
            Turn {
                role: TurnRole::Assistant,
                content: "answered last, stamped earliest".to_string(),
                created_at: base - chrono::Duration::seconds(10),
            },
        ];
        let rec = ConversationRecord {
            id,
            persona_key: "analyst".to_string(),
            turns,
            saved_at: base,
        };
        store.persist(&rec).await.unwrap();

        let loaded = store.get(&id).await.unwrap();
        assert_eq!(loaded.turns[1].content, "asked second, stamped later");
        assert_eq!(loaded.turns[2].content, "answered last, stamped earliest");
    }
}
