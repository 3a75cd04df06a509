//! JSON body extractor whose rejections use the API error format.

use axum::extract::FromRequest;

use crate::http::error::AppError;

/// `axum::Json`, but malformed bodies become `400 VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
