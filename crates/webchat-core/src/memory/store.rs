//! MemoryStore trait definition.
//!
//! Durable, append-only log of per-user utterances. Implementations live in
//! webchat-infra (`SqliteMemoryStore`, `PgMemoryStore`).

use chrono::{DateTime, Utc};
use webchat_types::error::StorageError;
use webchat_types::memory::{Actor, MemoryRecord};

/// Whether `text` carries anything worth storing.
pub fn is_storable(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Repository trait for durable user memory.
///
/// Append and read are each a single statement; no transaction spans calls.
/// Storage failures are returned as-is, never retried here.
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MemoryStore: Send + Sync {
    /// Append one record.
    ///
    /// Blank `text` is a no-op that returns `Ok(false)`. `created_at`
    /// defaults to the current UTC time; request flows always pass `None`
    /// so insert order and timestamp order agree. An explicit value is only
    /// for seeding or importing history.
    fn append(
        &self,
        user_id: &str,
        session_id: &str,
        actor: Actor,
        text: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> impl std::future::Future<Output = Result<bool, StorageError>> + Send;

    /// Most recent records for a user, newest first, at most `limit`.
    fn recent_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryRecord>, StorageError>> + Send;

    /// Number of records stored for a user.
    fn count_by_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, StorageError>> + Send;
}


#[cfg(test)]
mod tests {
    use super::test_support::InMemoryStore;
    use super::*;

    #[test]
    fn test_is_storable() {
        assert!(is_storable("hello"));
        assert!(is_storable("  hello  "));
        assert!(!is_storable(""));
        assert!(!is_storable("   \n\t"));
    }

    #[tokio::test]
    async fn test_blank_append_is_noop() {
        let store = InMemoryStore::default();
        assert!(!store.append("u1", "s1", Actor::User, "", None).await.unwrap());
        assert!(!store.append("u1", "s1", Actor::User, "   ", None).await.unwrap());
        assert_eq!(store.count_by_user("u1").await.unwrap(), 0);
    }
}
