use super::chunker::chunk_text;
use super::error::TtsServiceError;
use super::model::{AudioResult, ProviderKind, SynthesisRequest, VoiceDescriptor, AUDIO_FORMAT};
use super::registry::ProviderRegistry;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub struct TtsService {
    registry: Arc<ProviderRegistry>,
    voice_cache: Option<Cache<ProviderKind, Vec<VoiceDescriptor>>>,
}

impl TtsService {
    pub fn new(registry: Arc<ProviderRegistry>, cache_enabled: bool, cache_ttl: Duration) -> Self {
        let voice_cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(ProviderKind::ALL.len() as u64)
                    .time_to_live(cache_ttl)
                    .build(),
            )
        } else {
            None
        };

        Self {
            registry,
            voice_cache,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize a request to a single MP3 buffer
    ///
    /// This operation:
    /// - Resolves the provider (explicit name or configured default)
    /// - Applies the caller's voice settings to a fresh adapter
    /// - Lets the adapter chunk and dispatch the text
    ///
    /// No partial audio is ever returned. Firing `cancel` stops in-flight
    /// chunk calls and yields `TtsServiceError::Cancelled`.
    async fn synthesize(
        &self,
        request: SynthesisRequest,
        cancel: &CancellationToken,
    ) -> Result<AudioResult, TtsServiceError>;

    /// Voice catalog of a provider, the default one when `provider` is None.
    /// Remote failures are absorbed with the provider's fallback catalog.
    async fn list_voices(
        &self,
        provider: Option<&str>,
    ) -> Result<Vec<VoiceDescriptor>, TtsServiceError>;

    fn available_providers(&self) -> Vec<ProviderKind>;

    fn default_provider(&self) -> ProviderKind;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
        cancel: &CancellationToken,
    ) -> Result<AudioResult, TtsServiceError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TtsServiceError::Invalid(
                "Missing required parameter: text".to_string(),
            ));
        }

        let provider = self
            .registry
            .create_service(request.provider.as_deref(), &request.voice_settings)?;
        let kind = provider.kind();
        let char_count = text.chars().count();

        tracing::info!(
            provider = %kind,
            requested_provider = ?request.provider,
            text_length = char_count,
            "TTS synthesis request"
        );

        let start = Instant::now();
        let audio_data = provider.synthesize(text, cancel).await.map_err(|e| {
            let err = TtsServiceError::from(e);
            match &err {
                TtsServiceError::Cancelled => {
                    tracing::info!(provider = %kind, "TTS synthesis cancelled")
                }
                _ => tracing::error!(provider = %kind, error = %err, "TTS synthesis failed"),
            }
            err
        })?;
        let latency = start.elapsed();

        let chunk_count = chunk_text(text, provider.max_text_length())
            .map_err(|e| TtsServiceError::Chunking(e.to_string()))?
            .len();

        let audio_size = audio_data.len();
        let throughput_chars_per_sec = if latency.as_secs_f64() > 0.0 {
            char_count as f64 / latency.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            provider = %kind,
            latency_ms = latency.as_millis() as u64,
            text_length = char_count,
            chunk_count = chunk_count,
            audio_size_bytes = audio_size,
            throughput_chars_per_sec = %format!("{:.2}", throughput_chars_per_sec),
            "TTS synthesis completed"
        );

        Ok(AudioResult {
            audio_data,
            format: AUDIO_FORMAT,
            provider: kind,
            voice_options: provider.voice_options(),
            char_count,
            chunk_count,
        })
    }

    async fn list_voices(
        &self,
        provider: Option<&str>,
    ) -> Result<Vec<VoiceDescriptor>, TtsServiceError> {
        let kind = match provider.map(str::trim).filter(|p| !p.is_empty()) {
            Some(name) => name
                .parse::<ProviderKind>()
                .map_err(|_| TtsServiceError::UnsupportedProvider(name.to_string()))?,
            None => self.registry.default_provider(),
        };

        if let Some(cache) = &self.voice_cache {
            if let Some(voices) = cache.get(&kind).await {
                tracing::debug!(
                    provider = %kind,
                    voice_count = voices.len(),
                    "Voice catalog cache hit"
                );
                return Ok(voices);
            }
        }

        let adapter = self.registry.instantiate(kind);
        match adapter.fetch_voices().await {
            Ok(voices) => {
                if let Some(cache) = &self.voice_cache {
                    cache.insert(kind, voices.clone()).await;
                }
                tracing::info!(
                    provider = %kind,
                    voice_count = voices.len(),
                    "Voice catalog fetched"
                );
                Ok(voices)
            }
            Err(e) => {
                tracing::warn!(
                    provider = %kind,
                    error = %e,
                    "Voice catalog unavailable, using fallback catalog"
                );
                Ok(adapter.fallback_voices())
            }
        }
    }

    fn available_providers(&self) -> Vec<ProviderKind> {
        self.registry.available_providers()
    }

    fn default_provider(&self) -> ProviderKind {
        self.registry.default_provider()
    }
}
