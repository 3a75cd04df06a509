//! Axum router configuration with middleware.
//!
//! Routes live under `/ai/`.
//! Middleware: CORS, tracing, optional request timeout (408 on expiry).

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState, request_timeout: Option<Duration>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/ai/health", get(handlers::health::health))
        .route("/ai/answer", post(handlers::answer::answer))
        .route("/ai/memory_update", post(handlers::memory::memory_update))
        .route("/ai/suggest", post(handlers::suggest::suggest))
        .with_state(state);

    if let Some(timeout) = request_timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
