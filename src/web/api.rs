// src/web/api.rs
// REST handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};

use super::error::ApiResult;
use super::state::AppState;
use crate::chat::{ChatRequest, ResponseEnvelope};

/// Health check; no side effects
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Classify the message and return the generated result.
/// Body rejections are reported through `ApiError` so every failure is `{detail}`.
pub async fn chat_report(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ResponseEnvelope>> {
    let Json(request) = payload?;
    let envelope = state.service.handle(&request).await?;
    Ok(Json(envelope))
}
