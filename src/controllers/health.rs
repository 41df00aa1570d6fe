use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::{TtsService, TtsServiceApi};

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

/// The credential-free provider is always available, so this only reports
/// which providers can synthesize
pub async fn health_ready(State(tts_service): State<Arc<TtsService>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "providers": tts_service.available_providers(),
            "default_provider": tts_service.default_provider(),
        })),
    )
}
