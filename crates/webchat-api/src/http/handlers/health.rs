//! GET /ai/health - Liveness probe reporting the configured model.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub model: String,
}

/// GET /ai/health - Always `ok: true` while the process serves requests.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        model: state.assistant.model().to_string(),
    })
}
