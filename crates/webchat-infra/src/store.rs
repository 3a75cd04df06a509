//! Backend selection for the memory store.

use chrono::{DateTime, Utc};
use webchat_core::memory::store::MemoryStore;
use webchat_types::error::StorageError;
use webchat_types::memory::{Actor, MemoryRecord};

use crate::db_url::is_sqlite_url;
use crate::postgres::memory::PgMemoryStore;
use crate::sqlite::memory::SqliteMemoryStore;

/// Memory store chosen at startup from the `DATABASE_URL` scheme.
#[derive(Clone)]
pub enum DatabaseMemoryStore {
    Sqlite(SqliteMemoryStore),
    Postgres(PgMemoryStore),
}

impl DatabaseMemoryStore {
    /// Connect to `sqlite:` or `postgres:`/`postgresql:` URLs.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        if is_sqlite_url(database_url) {
            tracing::debug!("Using SQLite memory store");
            return Ok(Self::Sqlite(SqliteMemoryStore::connect(database_url).await?));
        }
        if database_url.starts_with("postgres:") || database_url.starts_with("postgresql:") {
            tracing::debug!("Using Postgres memory store");
            return Ok(Self::Postgres(PgMemoryStore::connect(database_url).await?));
        }

        let scheme = database_url.split(':').next().unwrap_or_default();
        Err(StorageError::Connection(format!(
            "unsupported database scheme '{scheme}'"
        )))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl MemoryStore for DatabaseMemoryStore {
    async fn append(
        &self,
        user_id: &str,
        session_id: &str,
        actor: Actor,
        text: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StorageError> {
        match self {
            Self::Sqlite(s) => s.append(user_id, session_id, actor, text, created_at).await,
            Self::Postgres(s) => s.append(user_id, session_id, actor, text, created_at).await,
        }
    }

    async fn recent_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<MemoryRecord>, StorageError> {
        match self {
            Self::Sqlite(s) => s.recent_by_user(user_id, limit).await,
            Self::Postgres(s) => s.recent_by_user(user_id, limit).await,
        }
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, StorageError> {
        match self {
            Self::Sqlite(s) => s.count_by_user(user_id).await,
            Self::Postgres(s) => s.count_by_user(user_id).await,
        }
    }
}

/// Classify a sqlx error into the storage error taxonomy.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if !matches!(db.kind(), sqlx::error::ErrorKind::Other) => {
            StorageError::Constraint(db.message().to_string())
        }
        sqlx::Error::Configuration(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StorageError::Connection(e.to_string()),
        _ => StorageError::Query(e.to_string()),
    }
}
