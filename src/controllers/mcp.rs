use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        session::SessionRegistry,
        tts::{ProviderKind, TtsService, TtsServiceApi, VoiceDescriptor, AUDIO_FORMAT},
    },
    error::{AppError, AppResult},
};

const SERVICE_NAME: &str = "Claude Voice MCP";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

const RATE_RANGE: (f32, f32, f32) = (0.5, 2.0, 1.0);
const PITCH_RANGE: (f32, f32, f32) = (0.5, 2.0, 1.0);

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    pub name: String,
    pub version: String,
    pub capabilities: Vec<String>,
    pub protocols: Vec<String>,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoCapabilities {
    pub tts: bool,
    pub stt: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub capabilities: InfoCapabilities,
    pub protocol_version: String,
    pub service_id: String,
    pub display_name: String,
    pub description: String,
    pub supports_streaming: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub websocket: String,
    pub rest: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TtsCapabilities {
    pub voices: Vec<VoiceDescriptor>,
    pub formats: Vec<String>,
    pub streaming: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterCapabilities {
    pub tts: TtsCapabilities,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    pub session_id: Uuid,
    pub service_endpoints: ServiceEndpoints,
    pub capabilities: RegisterCapabilities,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TtsConfigResponse {
    pub voices: Vec<VoiceDescriptor>,
    pub default_voice: String,
    pub default_provider: ProviderKind,
    pub providers: Vec<ProviderKind>,
    pub formats: Vec<String>,
    pub streaming: bool,
    pub rate_min: f32,
    pub rate_max: f32,
    pub rate_default: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub pitch_default: f32,
}

/// Service metadata the desktop client uses to discover and register
pub struct McpController {
    tts_service: Arc<TtsService>,
    sessions: Arc<SessionRegistry>,
    port: u16,
}

impl McpController {
    pub fn new(tts_service: Arc<TtsService>, sessions: Arc<SessionRegistry>, port: u16) -> Self {
        Self {
            tts_service,
            sessions,
            port,
        }
    }

    /// GET /discovery
    pub async fn discovery() -> Json<DiscoveryResponse> {
        Json(DiscoveryResponse {
            name: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            capabilities: vec!["text-to-speech".to_string()],
            protocols: vec!["websocket".to_string(), "http".to_string()],
            status: "available".to_string(),
        })
    }

    /// GET /api/v1/info
    pub async fn info() -> Json<InfoResponse> {
        tracing::debug!("MCP info requested");

        Json(InfoResponse {
            name: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            service_type: "voice".to_string(),
            capabilities: InfoCapabilities {
                tts: true,
                stt: false,
            },
            protocol_version: "1.0".to_string(),
            service_id: "claude-voice-mcp".to_string(),
            display_name: "Claude Voice Interface".to_string(),
            description: "MCP server providing voice capabilities for Claude Desktop".to_string(),
            supports_streaming: false,
        })
    }

    /// GET /api/v1/health
    pub async fn health(State(controller): State<Arc<McpController>>) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
            "connected_clients": controller.sessions.connected_clients().await,
        }))
    }

    /// POST /api/v1/register
    pub async fn register(
        State(controller): State<Arc<McpController>>,
        headers: HeaderMap,
        body: Option<Json<RegisterRequest>>,
    ) -> AppResult<Json<RegisterResponse>> {
        let request = body.map(|Json(r)| r).unwrap_or_default();

        tracing::info!(
            client_id = ?request.client_id,
            client_name = ?request.client_name,
            client_version = ?request.client_version,
            "MCP registration request"
        );

        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| format!("localhost:{}", controller.port));

        let voices = controller
            .tts_service
            .list_voices(None)
            .await
            .map_err(AppError::from)?;

        Ok(Json(RegisterResponse {
            status: "registered".to_string(),
            session_id: Uuid::new_v4(),
            service_endpoints: ServiceEndpoints {
                websocket: format!("ws://{}/api/v1/ws", host),
                rest: format!("http://{}/api/v1", host),
            },
            capabilities: RegisterCapabilities {
                tts: TtsCapabilities {
                    voices,
                    formats: vec![AUDIO_FORMAT.to_string()],
                    streaming: false,
                },
            },
        }))
    }

    /// GET /api/v1/tts/config
    pub async fn tts_config(
        State(controller): State<Arc<McpController>>,
    ) -> AppResult<Json<TtsConfigResponse>> {
        let default_provider = controller.tts_service.default_provider();
        let voices = controller
            .tts_service
            .list_voices(Some(default_provider.as_str()))
            .await
            .map_err(AppError::from)?;
        let default_voice = controller
            .tts_service
            .registry()
            .instantiate(default_provider)
            .voice_options()
            .voice_id()
            .to_string();

        Ok(Json(TtsConfigResponse {
            voices,
            default_voice,
            default_provider,
            providers: controller.tts_service.available_providers(),
            formats: vec![AUDIO_FORMAT.to_string()],
            streaming: false,
            rate_min: RATE_RANGE.0,
            rate_max: RATE_RANGE.1,
            rate_default: RATE_RANGE.2,
            pitch_min: PITCH_RANGE.0,
            pitch_max: PITCH_RANGE.1,
            pitch_default: PITCH_RANGE.2,
        }))
    }
}
