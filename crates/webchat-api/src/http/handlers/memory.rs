//! POST /ai/memory_update - Persist one utterance as durable memory.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use webchat_core::service::MemoryUpdateInput;
use webchat_types::memory::Actor;

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUpdateRequest {
    pub session_id: String,
    pub user_id: String,
    pub actor: String,
    pub text: String,
    /// Client-side timestamp. Accepted for compatibility, never stored:
    /// records are stamped by the store at insert time.
    #[serde(default)]
    pub ts: Option<Value>,
}

/// POST /ai/memory_update - Store the utterance, then mirror it best-effort.
///
/// Blank text is accepted and stores nothing.
pub async fn memory_update(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MemoryUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let actor: Actor = req.actor.parse().map_err(AppError::Validation)?;
    if let Some(ts) = &req.ts {
        tracing::debug!(client_ts = %ts, "Ignoring client timestamp on memory update");
    }

    state
        .assistant
        .update_memory(MemoryUpdateInput {
            session_id: req.session_id,
            user_id: req.user_id,
            actor,
            text: req.text,
        })
        .await?;

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_any_ts_shape() {
        for ts in [json!("2020-01-01T00:00:00Z"), json!("whenever"), json!(1700000000), Value::Null] {
            let body = json!({"sessionId": "s1", "userId": "u1", "actor": "user", "text": "hi", "ts": ts});
            let req: MemoryUpdateRequest = serde_json::from_value(body).unwrap();
            assert_eq!(req.text, "hi");
        }

        let req: MemoryUpdateRequest =
            serde_json::from_value(json!({"sessionId": "s1", "userId": "u1", "actor": "bot", "text": "x"}))
                .unwrap();
        assert!(req.ts.is_none());
    }
}
