use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::conversion::ConversionService;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Report which provider backs each capability
pub async fn health_ready(State(service): State<Arc<ConversionService>>) -> impl IntoResponse {
    let (translation, synthesis, recognition) = service.providers();

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "translation": translation,
            "synthesis": synthesis,
            "recognition": recognition
        })),
    )
}
