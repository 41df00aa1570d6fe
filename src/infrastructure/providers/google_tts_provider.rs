use super::dispatch::synthesize_in_chunks;
use super::tts_provider::{ProviderError, TtsProvider};
use crate::domain::tts::{
    GoogleVoiceOptions, ProviderKind, TextChunk, VoiceDescriptor, VoiceOptions, VoiceSettings,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// The translate TTS endpoint rejects longer inputs
const MAX_TEXT_LENGTH: usize = 200;

const DEFAULT_VOICE: &str = "en-US";
const NORMAL_SPEED: &str = "1";
const SLOW_SPEED: &str = "0.24";

const RATE_RANGE: (f32, f32) = (0.5, 2.0);
const PITCH_RANGE: (f32, f32) = (0.5, 2.0);

#[derive(Debug, Clone)]
pub struct GoogleTtsSettings {
    pub host: String,
    pub default_language: String,
    pub max_concurrent_chunks: usize,
}

/// Free translate-backed TTS. No credential, unauthenticated GET per chunk.
pub struct GoogleTtsProvider {
    http_client: reqwest::Client,
    settings: GoogleTtsSettings,
    options: GoogleVoiceOptions,
}

impl GoogleTtsProvider {
    pub fn new(http_client: reqwest::Client, settings: GoogleTtsSettings) -> Self {
        let options = GoogleVoiceOptions {
            voice: DEFAULT_VOICE.to_string(),
            language: settings.default_language.clone(),
            pitch: 1.0,
            rate: 1.0,
            slow: false,
        };

        Self {
            http_client,
            settings,
            options,
        }
    }

    /// Static catalog, the translate endpoint has no voice listing
    pub fn catalog() -> Vec<VoiceDescriptor> {
        [
            ("en-US", "English (US)", "en"),
            ("en-GB", "English (UK)", "en"),
            ("es-ES", "Spanish", "es"),
            ("fr-FR", "French", "fr"),
            ("de-DE", "German", "de"),
            ("it-IT", "Italian", "it"),
            ("ja-JP", "Japanese", "ja"),
            ("ko-KR", "Korean", "ko"),
            ("pt-BR", "Portuguese (Brazil)", "pt"),
            ("ru-RU", "Russian", "ru"),
            ("zh-CN", "Chinese (Simplified)", "zh-CN"),
        ]
        .iter()
        .map(|(id, name, language)| VoiceDescriptor::new(id, name, language, ProviderKind::Google))
        .collect()
    }

    /// Fetch audio for a single chunk
    async fn fetch_chunk(&self, chunk: TextChunk) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/translate_tts", self.settings.host.trim_end_matches('/'));
        let text_length = chunk.content.chars().count().to_string();
        let speed = if self.options.slow { SLOW_SPEED } else { NORMAL_SPEED };

        tracing::debug!(
            chunk_index = chunk.index,
            text_length = %text_length,
            language = %self.options.language,
            "Calling Google TTS"
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk.content.as_str()),
                ("tl", self.options.language.as_str()),
                ("total", "1"),
                ("idx", "0"),
                ("textlen", text_length.as_str()),
                ("client", "tw-ob"),
                ("prev", "input"),
                ("ttsspeed", speed),
            ])
            .send()
            .await
            .map_err(|e| transport_error(format!("Failed to fetch audio: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                chunk_index = chunk.index,
                "Google TTS returned an error status"
            );
            return Err(transport_error(format!("Failed to fetch audio: {}", status)));
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
        provider: ProviderKind::Google,
        message,
    }
}

fn check_range(name: &str, value: f32, (min, max): (f32, f32)) -> Result<f32, ProviderError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ProviderError::InvalidOptions(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )))
    }
}

#[async_trait]
impl TtsProvider for GoogleTtsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn max_text_length(&self) -> usize {
        MAX_TEXT_LENGTH
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn voice_options(&self) -> VoiceOptions {
        VoiceOptions::Google(self.options.clone())
    }

    fn set_voice_options(&mut self, options: VoiceOptions) -> Result<(), ProviderError> {
        match options {
            VoiceOptions::Google(options) => {
                self.options = options;
                Ok(())
            }
            other => Err(ProviderError::InvalidOptions(format!(
                "{} options cannot be used with google",
                other.provider()
            ))),
        }
    }

    fn apply_settings(&mut self, settings: &VoiceSettings) -> Result<(), ProviderError> {
        let mut options = self.options.clone();

        if let Some(voice) = &settings.voice {
            let descriptor = Self::catalog()
                .into_iter()
                .find(|v| v.id.eq_ignore_ascii_case(voice))
                .ok_or_else(|| {
                    ProviderError::InvalidOptions(format!("unknown Google TTS voice: {}", voice))
                })?;
            options.voice = descriptor.id;
            options.language = descriptor.language;
        }
        if let Some(language) = &settings.language {
            options.language = language.clone();
        }
        if let Some(pitch) = settings.pitch {
            options.pitch = check_range("pitch", pitch, PITCH_RANGE)?;
        }
        if let Some(rate) = settings.rate {
            options.rate = check_range("rate", rate, RATE_RANGE)?;
            options.slow = rate < 1.0;
        }
        if let Some(slow) = settings.slow {
            options.slow = slow;
        }

        self.options = options;
        Ok(())
    }

    async fn synthesize(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(
            text_preview = %text.chars().take(50).collect::<String>(),
            voice = %self.options.voice,
            "Converting text to speech with Google TTS"
        );

        synthesize_in_chunks(
            ProviderKind::Google,
            text,
            MAX_TEXT_LENGTH,
            self.settings.max_concurrent_chunks,
            cancel,
            |chunk| self.fetch_chunk(chunk),
        )
        .await
    }

    async fn fetch_voices(&self) -> Result<Vec<VoiceDescriptor>, ProviderError> {
        Ok(Self::catalog())
    }

    fn fallback_voices(&self) -> Vec<VoiceDescriptor> {
        Self::catalog()
    }
}
