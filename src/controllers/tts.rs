use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::tts::{
        sanitize_text, ProviderKind, SynthesisRequest, TtsService, TtsServiceApi,
        VoiceDescriptor, VoiceSettings,
    },
    error::{AppError, AppResult},
};

/// Request for POST /api/v1/tts
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default, alias = "voiceOptions")]
    pub voice_options: Option<VoiceSettings>,
}

#[derive(Debug, Deserialize)]
pub struct VoicesQuery {
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub default: ProviderKind,
    pub providers: Vec<ProviderKind>,
}

pub struct TtsController {
    tts_service: Arc<TtsService>,
    max_text_length: usize,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>, max_text_length: usize) -> Self {
        Self {
            tts_service,
            max_text_length,
        }
    }

    /// POST /api/v1/tts - Convert text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let text = sanitize_text(&request.text);
        let char_count = text.chars().count();

        if char_count == 0 {
            return Err(AppError::BadRequest(
                "Missing required parameter: text".to_string(),
            ));
        }

        if char_count > controller.max_text_length {
            return Err(AppError::PayloadTooLarge(format!(
                "Text must be {} characters or less",
                controller.max_text_length
            )));
        }

        let mut synthesis = SynthesisRequest::new(text)
            .with_voice_settings(request.voice_options.unwrap_or_default());
        if let Some(provider) = request.provider {
            synthesis = synthesis.with_provider(provider);
        }

        // A dropped connection drops this future, so the token never fires here
        let result = controller
            .tts_service
            .synthesize(synthesis, &CancellationToken::new())
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
        headers.insert(
            HeaderName::from_static("x-provider"),
            HeaderValue::from_static(result.provider.as_str()),
        );
        headers.insert(
            HeaderName::from_static("x-audio-format"),
            HeaderValue::from_static(result.format),
        );
        headers.insert(
            HeaderName::from_static("x-character-count"),
            HeaderValue::from(result.char_count),
        );
        headers.insert(
            HeaderName::from_static("x-chunk-count"),
            HeaderValue::from(result.chunk_count),
        );

        Ok((StatusCode::OK, headers, Body::from(result.audio_data)))
    }

    /// GET /api/v1/tts/voices - Voice catalog of a provider
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
        Query(query): Query<VoicesQuery>,
    ) -> AppResult<Json<Vec<VoiceDescriptor>>> {
        let voices = controller
            .tts_service
            .list_voices(query.provider.as_deref())
            .await?;

        Ok(Json(voices))
    }

    /// GET /api/v1/tts/providers - Default and available providers
    pub async fn list_providers(
        State(controller): State<Arc<TtsController>>,
    ) -> Json<ProvidersResponse> {
        Json(ProvidersResponse {
            default: controller.tts_service.default_provider(),
            providers: controller.tts_service.available_providers(),
        })
    }
}
