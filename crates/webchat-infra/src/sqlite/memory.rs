//! SQLite memory store implementation.
//!
//! Implements `MemoryStore` from `webchat-core` using sqlx with split read/write
//! pools: raw queries, a private Row struct, appends on the single writer.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use webchat_core::memory::store::{is_storable, MemoryStore};
use webchat_types::error::StorageError;
use webchat_types::memory::{Actor, MemoryRecord};

use super::pool::DatabasePool;
use crate::store::map_sqlx_error;

/// SQLite-backed implementation of `MemoryStore`.
#[derive(Clone)]
pub struct SqliteMemoryStore {
    pool: DatabasePool,
}

impl SqliteMemoryStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Open (and migrate) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = DatabasePool::new(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MemoryRow {
    user_id: String,
    session_id: String,
    actor: String,
    text: String,
    created_at: String,
}

impl MemoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            session_id: row.try_get("session_id")?,
            actor: row.try_get("actor")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<MemoryRecord, StorageError> {
        let actor: Actor = self.actor.parse().map_err(StorageError::Query)?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(MemoryRecord {
            user_id: self.user_id,
            session_id: self.session_id,
            actor,
            text: self.text,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC form so lexical order matches chronological order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// MemoryStore implementation
// ---------------------------------------------------------------------------

impl MemoryStore for SqliteMemoryStore {
    async fn append(
        &self,
        user_id: &str,
        session_id: &str,
        actor: Actor,
        text: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StorageError> {
        if !is_storable(text) {
            return Ok(false);
        }
        let created_at = created_at.unwrap_or_else(Utc::now);

        sqlx::query(
            r#"INSERT INTO agent_memories (user_id, session_id, actor, text, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(session_id)
        .bind(actor.to_string())
        .bind(text)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(true)
    }

    async fn recent_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<MemoryRecord>, StorageError> {
        let rows = sqlx::query(
            r#"SELECT user_id, session_id, actor, text, created_at
               FROM agent_memories
               WHERE user_id = ?
               ORDER BY created_at DESC, id DESC
               LIMIT ?"#,
        )
        .bind(user_id)
        .bind(limit.max(0))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                MemoryRow::from_row(row)
                    .map_err(|e| StorageError::Query(e.to_string()))?
                    .into_record()
            })
            .collect()
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agent_memories WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }
}
