//! POST /ai/suggest - Reply suggestions for a human support agent.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use webchat_core::service::SuggestInput;
use webchat_core::suggest::DEFAULT_SUGGESTION_COUNT;
use webchat_types::chat::ConversationTurn;

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub session_id: String,
    pub user_id: String,
    pub last_messages: Vec<ConversationTurn>,
    #[serde(default = "default_max")]
    pub max: usize,
}

fn default_max() -> usize {
    DEFAULT_SUGGESTION_COUNT
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// POST /ai/suggest - Run the coaching agent over the visible thread.
pub async fn suggest(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SuggestRequest>,
) -> Result<Json<SuggestResponse>, AppError> {
    let suggestions = state
        .assistant
        .suggest(SuggestInput {
            session_id: req.session_id,
            user_id: req.user_id,
            last_messages: req.last_messages,
            max: req.max,
        })
        .await?;

    Ok(Json(SuggestResponse { suggestions }))
}
