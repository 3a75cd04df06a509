//! POST /ai/answer - Memory-aware answer for an end user.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use webchat_core::service::AnswerInput;
use webchat_types::agent::Source;
use webchat_types::chat::{ConversationTurn, PromptContext};

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub session_id: String,
    pub user_id: String,
    pub messages: Vec<ConversationTurn>,
    #[serde(default)]
    pub context: Option<PromptContext>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub text: String,
    pub sources: Vec<Source>,
}

/// POST /ai/answer - Run the chat agent with recalled memory injected.
pub async fn answer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let output = state
        .assistant
        .answer(AnswerInput {
            session_id: req.session_id,
            user_id: req.user_id,
            messages: req.messages,
            context: req.context,
        })
        .await?;

    Ok(Json(AnswerResponse {
        text: output.text,
        sources: output.sources,
    }))
}
