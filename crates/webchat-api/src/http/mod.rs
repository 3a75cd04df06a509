//! HTTP/REST API layer.
//!
//! Axum-based JSON API under `/ai/` with a flat error format and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
