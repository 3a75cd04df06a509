//! Postgres memory store implementation.
//!
//! Same contract as the SQLite store; timestamps are native `TIMESTAMPTZ`.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use webchat_core::memory::store::{is_storable, MemoryStore};
use webchat_types::error::StorageError;
use webchat_types::memory::{Actor, MemoryRecord};

use crate::db_url::normalize_database_url;
use crate::store::map_sqlx_error;

/// Postgres-backed implementation of `MemoryStore`.
#[derive(Clone)]
pub struct PgMemoryStore {
    pool: PgPool,
}

impl PgMemoryStore {
    /// Wrap an existing pool. Migrations are assumed to have run.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Normalize `database_url`, connect, and run the Postgres migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let url = normalize_database_url(database_url)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let pool = PgPoolOptions::new()
            .connect(&url)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::migrate!("../../migrations/postgres")
            .run(&pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;

        Ok(Self::new(pool))
    }
}

#[derive(FromRow)]
struct MemoryRow {
    user_id: String,
    session_id: String,
    actor: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl MemoryRow {
    fn into_record(self) -> Result<MemoryRecord, StorageError> {
        Ok(MemoryRecord {
            actor: self.actor.parse().map_err(StorageError::Query)?,
            user_id: self.user_id,
            session_id: self.session_id,
            text: self.text,
            created_at: self.created_at,
        })
    }
}

impl MemoryStore for PgMemoryStore {
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

        sqlx::query(
            r#"INSERT INTO agent_memories (user_id, session_id, actor, text, created_at)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(user_id)
        .bind(session_id)
        .bind(actor.to_string())
        .bind(text)
        .bind(created_at.unwrap_or_else(Utc::now))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(true)
    }

    async fn recent_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<MemoryRecord>, StorageError> {
        let rows = sqlx::query_as::<_, MemoryRow>(
            r#"SELECT user_id, session_id, actor, text, created_at
               FROM agent_memories
               WHERE user_id = $1
               ORDER BY created_at DESC, id DESC
               LIMIT $2"#,
        )
        .bind(user_id)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MemoryRow::into_record).collect()
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM agent_memories WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    /// Connect to the database named by `TEST_DATABASE_URL`, if any.
    ///
    /// Tests return early without it so the default suite needs no server.
    async fn test_store() -> Option<PgMemoryStore> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        if url.trim().is_empty() {
            return None;
        }
        Some(PgMemoryStore::connect(&url).await.unwrap())
    }

    /// User id unique to one test run; tests share the database.
    fn unique_user(tag: &str) -> String {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("pg-{tag}-{}-{nanos}", std::process::id())
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let Some(store) = test_store().await else { return };
        let user = unique_user("roundtrip");

        let written = store
            .append(&user, "s1", Actor::User, "I prefer email", None)
            .await
            .unwrap();
        assert!(written);

        let records = store.recent_by_user(&user, 5).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, user);
        assert_eq!(records[0].session_id, "s1");
        assert_eq!(records[0].actor, Actor::User);
        assert_eq!(records[0].text, "I prefer email");
        assert_eq!(store.count_by_user(&user).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_newest_first_and_limit() {
        let Some(store) = test_store().await else { return };
        let user = unique_user("order");
        let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2025, 1, 3, 23, 59, 0).unwrap();

        store.append(&user, "s1", Actor::User, "first", Some(t2)).await.unwrap();
        store.append(&user, "s1", Actor::Agent, "second", Some(t1)).await.unwrap();
        store.append(&user, "s2", Actor::Bot, "third", Some(t3)).await.unwrap();

        let records = store.recent_by_user(&user, 50).await.unwrap();
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "first", "second"]);
        assert_eq!(records[0].created_at, t3);

        let limited = store.recent_by_user(&user, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].text, "third");

        assert!(store.recent_by_user(&user, 0).await.unwrap().is_empty());
        assert!(store.recent_by_user(&user, -3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ties_break_by_insertion_order() {
        let Some(store) = test_store().await else { return };
        let user = unique_user("ties");
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        store.append(&user, "s1", Actor::User, "a", Some(t)).await.unwrap();
        store.append(&user, "s1", Actor::User, "b", Some(t)).await.unwrap();

        let records = store.recent_by_user(&user, 10).await.unwrap();
        assert_eq!(records[0].text, "b");
        assert_eq!(records[1].text, "a");
    }

    #[tokio::test]
    async fn test_default_timestamps_follow_insert_order() {
        let Some(store) = test_store().await else { return };
        let user = unique_user("now");

        for text in ["one", "two", "three"] {
            store.append(&user, "s1", Actor::User, text, None).await.unwrap();
        }

        let records = store.recent_by_user(&user, 10).await.unwrap();
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["three", "two", "one"]);
    }

    #[tokio::test]
    async fn test_blank_text_is_noop() {
        let Some(store) = test_store().await else { return };
        let user = unique_user("blank");

        let written = store.append(&user, "s1", Actor::User, "  \n\t ", None).await.unwrap();
        assert!(!written);
        assert_eq!(store.count_by_user(&user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_text_stored_verbatim() {
        let Some(store) = test_store().await else { return };
        let user = unique_user("verbatim");

        store.append(&user, "s1", Actor::User, "  padded  ", None).await.unwrap();
        let records = store.recent_by_user(&user, 1).await.unwrap();
        assert_eq!(records[0].text, "  padded  ");
    }

    #[tokio::test]
    async fn test_actor_check_constraint() {
        let Some(store) = test_store().await else { return };
        let user = unique_user("check");

        let err = sqlx::query(
            "INSERT INTO agent_memories (user_id, session_id, actor, text) VALUES ($1, 's1', 'robot', 'x')",
        )
        .bind(&user)
        .execute(&store.pool)
        .await
        .map_err(map_sqlx_error)
        .unwrap_err();
        assert!(matches!(err, StorageError::Constraint(_)), "got {err:?}");
    }

    #[test]
    fn test_row_into_record() {
        let created_at = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
        let row = MemoryRow {
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            actor: "bot".to_string(),
            text: "Sent tracking link".to_string(),
            created_at,
        };
        let record = row.into_record().unwrap();
        assert_eq!(record.actor, Actor::Bot);
        assert_eq!(record.created_at, created_at);

        let row = MemoryRow {
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            actor: "robot".to_string(),
            text: "x".to_string(),
            created_at,
        };
        assert!(matches!(row.into_record(), Err(StorageError::Query(_))));
    }
}
