use super::dispatch::synthesize_in_chunks;
use super::tts_provider::{ProviderError, TtsProvider};
use crate::domain::tts::{
    ElevenLabsVoiceOptions, ProviderKind, TextChunk, VoiceDescriptor, VoiceOptions, VoiceSettings,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

const MAX_TEXT_LENGTH: usize = 5000;

const DEFAULT_STABILITY: f32 = 0.5;
const DEFAULT_SIMILARITY_BOOST: f32 = 0.75;

#[derive(Debug, Clone)]
pub struct ElevenLabsSettings {
    pub api_key: Option<String>,
    pub api_url: String,
    pub default_voice_id: String,
    pub model_id: String,
    pub max_concurrent_chunks: usize,
}

pub struct ElevenLabsTtsProvider {
    http_client: reqwest::Client,
    settings: ElevenLabsSettings,
    options: ElevenLabsVoiceOptions,
}

#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettingsBody,
}

#[derive(Debug, Serialize)]
struct VoiceSettingsBody {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<RemoteVoice>,
}

#[derive(Debug, Deserialize)]
struct RemoteVoice {
    voice_id: String,
    name: String,
    #[serde(default)]
    labels: Option<RemoteVoiceLabels>,
    #[serde(default)]
    preview_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteVoiceLabels {
    language: Option<String>,
    gender: Option<String>,
}

impl From<RemoteVoice> for VoiceDescriptor {
    fn from(voice: RemoteVoice) -> Self {
        let labels = voice.labels.unwrap_or_default();
        Self {
            id: voice.voice_id,
            name: voice.name,
            language: labels.language.unwrap_or_else(|| "en".to_string()),
            provider: ProviderKind::ElevenLabs,
            gender: Some(labels.gender.unwrap_or_else(|| "unknown".to_string())),
            preview_url: voice.preview_url,
        }
    }
}

impl ElevenLabsTtsProvider {
    pub fn new(http_client: reqwest::Client, settings: ElevenLabsSettings) -> Self {
        let options = ElevenLabsVoiceOptions {
            voice_id: settings.default_voice_id.clone(),
            model_id: settings.model_id.clone(),
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
        };

        Self {
            http_client,
            settings,
            options,
        }
    }

    /// Premade voices served when the voices endpoint is unreachable
    pub fn catalog() -> Vec<VoiceDescriptor> {
        [
            ("21m00Tcm4TlvDq8ikWAM", "Rachel", "female"),
            ("AZnzlk1XvdvUeBnXmlld", "Domi", "female"),
            ("EXAVITQu4vr4xnSDxMaL", "Bella", "female"),
            ("ErXwobaYiN019PkySvjV", "Antoni", "male"),
            ("MF3mGyEYCl7XYWbV9V6O", "Elli", "female"),
            ("TxGEqnHWrfWFTfGW9XjX", "Josh", "male"),
            ("VR6AewLTigWG4xSOukaG", "Arnold", "male"),
            ("pNInz6obpgDQGcFmaJgB", "Adam", "male"),
            ("yoZ06aMxZJJ28mfd3POQ", "Sam", "male"),
        ]
        .iter()
        .map(|(id, name, gender)| {
            VoiceDescriptor::new(id, name, "en", ProviderKind::ElevenLabs).with_gender(gender)
        })
        .collect()
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::NotConfigured {
                provider: ProviderKind::ElevenLabs,
                reason: "Eleven Labs API key not configured".to_string(),
            })
    }

    fn base_url(&self) -> &str {
        self.settings.api_url.trim_end_matches('/')
    }

    async fn fetch_chunk(&self, api_key: &str, chunk: TextChunk) -> Result<Vec<u8>, ProviderError> {
        let url = format!(
            "{}/text-to-speech/{}",
            self.base_url(),
            self.options.voice_id
        );
        let body = SynthesisBody {
            text: &chunk.content,
            model_id: &self.options.model_id,
            voice_settings: VoiceSettingsBody {
                stability: self.options.stability,
                similarity_boost: self.options.similarity_boost,
            },
        };

        tracing::debug!(
            chunk_index = chunk.index,
            voice_id = %self.options.voice_id,
            model_id = %self.options.model_id,
            "Calling Eleven Labs text-to-speech"
        );

        let response = self
            .http_client
            .post(&url)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(format!("Eleven Labs request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // Prefer the structured body when the API returns one
            let detail = serde_json::from_str::<serde_json::Value>(&error_text)
                .map(|json| json.to_string())
                .unwrap_or(error_text);

            tracing::error!(
                status = status.as_u16(),
                chunk_index = chunk.index,
                error = %detail,
                "Eleven Labs API returned an error"
            );
            return Err(transport_error(format!(
                "Eleven Labs API error: {} {}",
                status, detail
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(format!("Failed to read audio: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

fn transport_error(message: String) -> ProviderError {
    ProviderError::Transport {
        provider: ProviderKind::ElevenLabs,
        message,
    }
}

/// Voice ids end up as a URL path segment
fn check_voice_id(voice_id: &str) -> Result<&str, ProviderError> {
    let valid = !voice_id.is_empty()
        && voice_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(voice_id)
    } else {
        Err(ProviderError::InvalidOptions(format!(
            "Invalid Eleven Labs voice id: {}",
            voice_id
        )))
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<f32, ProviderError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ProviderError::InvalidOptions(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )))
    }
}

#[async_trait]
impl TtsProvider for ElevenLabsTtsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ElevenLabs
    }

    fn max_text_length(&self) -> usize {
        MAX_TEXT_LENGTH
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    fn voice_options(&self) -> VoiceOptions {
        VoiceOptions::ElevenLabs(self.options.clone())
    }

    fn set_voice_options(&mut self, options: VoiceOptions) -> Result<(), ProviderError> {
        match options {
            VoiceOptions::ElevenLabs(options) => {
                check_voice_id(&options.voice_id)?;
                check_unit_interval("stability", options.stability)?;
                check_unit_interval("similarity_boost", options.similarity_boost)?;
                self.options = options;
                Ok(())
            }
            other => Err(ProviderError::InvalidOptions(format!(
                "{} options cannot be used with elevenlabs",
                other.provider()
            ))),
        }
    }

    fn apply_settings(&mut self, settings: &VoiceSettings) -> Result<(), ProviderError> {
        let mut options = self.options.clone();

        if let Some(voice) = settings.voice.as_deref().filter(|v| !v.trim().is_empty()) {
            options.voice_id = check_voice_id(voice.trim())?.to_string();
        }
        if let Some(model) = settings.model.as_deref().filter(|m| !m.trim().is_empty()) {
            options.model_id = model.to_string();
        }
        if let Some(stability) = settings.stability {
            options.stability = check_unit_interval("stability", stability)?;
        }
        if let Some(similarity_boost) = settings.similarity_boost {
            options.similarity_boost = check_unit_interval("similarity_boost", similarity_boost)?;
        }

        self.options = options;
        Ok(())
    }

    async fn synthesize(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ProviderError> {
        let api_key = self.api_key()?;

        tracing::info!(
            text_preview = %text.chars().take(50).collect::<String>(),
            voice_id = %self.options.voice_id,
            "Converting text to speech with Eleven Labs"
        );

        synthesize_in_chunks(
            ProviderKind::ElevenLabs,
            text,
            MAX_TEXT_LENGTH,
            self.settings.max_concurrent_chunks,
            cancel,
            |chunk| self.fetch_chunk(api_key, chunk),
        )
        .await
    }

    async fn fetch_voices(&self) -> Result<Vec<VoiceDescriptor>, ProviderError> {
        let api_key = self.api_key()?;
        let url = format!("{}/voices", self.base_url());

        let response = self
            .http_client
            .get(&url)
            .header("xi-api-key", api_key)
            .send()
            .await
            .map_err(|e| transport_error(format!("Failed to fetch voices: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport_error(format!(
                "Failed to fetch voices: {}",
                status
            )));
        }

        let payload: VoicesResponse = response
            .json()
            .await
            .map_err(|e| transport_error(format!("Invalid voices response: {}", e)))?;

        Ok(payload.voices.into_iter().map(VoiceDescriptor::from).collect())
    }

    fn fallback_voices(&self) -> Vec<VoiceDescriptor> {
        Self::catalog()
    }
}
