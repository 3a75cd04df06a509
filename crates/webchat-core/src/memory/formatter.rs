//! Renders recalled memory into the block injected into chat prompts.

use webchat_types::error::StorageError;
use webchat_types::memory::MemoryRecord;

use super::store::MemoryStore;

/// Minute-granularity timestamp, UTC as stored.
pub const MEMORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render a memory block from records ordered newest-first.
///
/// Output is oldest-first so the model reads memory chronologically:
///
/// ```text
/// Known persistent facts for user u-42 (from prior sessions):
/// - [2025-01-02 09:15] (user) S:s-1: I prefer email
/// - [2025-01-03 17:40] (agent) S:s-2: Sent the invoice
///
/// ```
///
/// Returns an empty string when there are no records.
pub fn render_memory_block(user_id: &str, newest_first: &[MemoryRecord]) -> String {
    if newest_first.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(newest_first.len() + 1);
    lines.push(format!(
        "Known persistent facts for user {user_id} (from prior sessions):"
    ));
    for record in newest_first.iter().rev() {
        lines.push(format!(
            "- [{}] ({}) S:{}: {}",
            record.created_at.format(MEMORY_TIMESTAMP_FORMAT),
            record.actor,
            record.session_id,
            record.text
        ));
    }

    lines.join("\n") + "\n\n"
}

/// Load up to `limit` recent records for `user_id` and render them.
///
/// An empty string means "no memory available", not an error.
pub async fn format_memory_block<M: MemoryStore>(
    store: &M,
    user_id: &str,
    limit: i64,
) -> Result<String, StorageError> {
    let records = store.recent_by_user(user_id, limit).await?;
    Ok(render_memory_block(user_id, &records))
}
