use super::error::TtsServiceError;
use super::model::{ProviderKind, VoiceSettings};
use crate::infrastructure::config::Config;
use crate::infrastructure::providers::{
    ElevenLabsSettings, ElevenLabsTtsProvider, GoogleTtsProvider, GoogleTtsSettings, TtsProvider,
};
use std::time::Duration;

/// Read-only provider table built once at startup.
///
/// Adapters are instantiated per request from the stored settings, so voice
/// options applied for one request are never visible to another. The HTTP
/// client is shared and carries the timeout applied to every remote call.
pub struct ProviderRegistry {
    http_client: reqwest::Client,
    google: GoogleTtsSettings,
    elevenlabs: ElevenLabsSettings,
    default_provider: ProviderKind,
}

impl ProviderRegistry {
    pub fn new(
        http_client: reqwest::Client,
        google: GoogleTtsSettings,
        elevenlabs: ElevenLabsSettings,
        default_provider: ProviderKind,
    ) -> Self {
        Self {
            http_client,
            google,
            elevenlabs,
            default_provider,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, TtsServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.tts_request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build provider HTTP client: {}", e))?;

        let default_provider = match config.tts_provider.as_deref() {
            None => ProviderKind::Google,
            Some(name) => name.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    provider = %name,
                    "Unknown TTS_PROVIDER, defaulting to google"
                );
                ProviderKind::Google
            }),
        };

        let google = GoogleTtsSettings {
            host: config.google_tts_host.clone(),
            default_language: config.google_tts_language.clone(),
            max_concurrent_chunks: config.tts_max_concurrent_chunks,
        };
        let elevenlabs = ElevenLabsSettings {
            api_key: config.elevenlabs_api_key.clone(),
            api_url: config.elevenlabs_api_url.clone(),
            default_voice_id: config.elevenlabs_default_voice.clone(),
            model_id: config.elevenlabs_model.clone(),
            max_concurrent_chunks: config.tts_max_concurrent_chunks,
        };

        Ok(Self::new(http_client, google, elevenlabs, default_provider))
    }

    /// Configured default, or google when the configured one lacks credentials
    pub fn default_provider(&self) -> ProviderKind {
        if self.instantiate(self.default_provider).is_configured() {
            self.default_provider
        } else {
            ProviderKind::Google
        }
    }

    /// Fresh adapter with its default voice options
    pub fn instantiate(&self, kind: ProviderKind) -> Box<dyn TtsProvider> {
        match kind {
            ProviderKind::Google => Box::new(GoogleTtsProvider::new(
                self.http_client.clone(),
                self.google.clone(),
            )),
            ProviderKind::ElevenLabs => Box::new(ElevenLabsTtsProvider::new(
                self.http_client.clone(),
                self.elevenlabs.clone(),
            )),
        }
    }

    /// Resolve a provider for one request and apply the caller's settings.
    ///
    /// An explicitly named provider must be known and configured. Without a
    /// name the configured default is used, falling back to google when the
    /// default lacks credentials.
    pub fn create_service(
        &self,
        name: Option<&str>,
        settings: &VoiceSettings,
    ) -> Result<Box<dyn TtsProvider>, TtsServiceError> {
        let requested = name.map(str::trim).filter(|n| !n.is_empty());

        let mut provider = match requested {
            Some(name) => {
                let kind: ProviderKind = name
                    .parse()
                    .map_err(|_| TtsServiceError::UnsupportedProvider(name.to_string()))?;
                let provider = self.instantiate(kind);
                if !provider.is_configured() {
                    return Err(TtsServiceError::Configuration {
                        provider: kind,
                        message: "missing credentials".to_string(),
                    });
                }
                provider
            }
            None => {
                let provider = self.instantiate(self.default_provider);
                if provider.is_configured() {
                    provider
                } else {
                    tracing::warn!(
                        provider = %self.default_provider,
                        "Default TTS provider not configured, falling back to google"
                    );
                    self.instantiate(ProviderKind::Google)
                }
            }
        };

        provider.apply_settings(settings)?;
        Ok(provider)
    }

    /// Configuration check by name, no network access. Unknown names are
    /// never configured.
    pub fn is_provider_configured(&self, name: &str) -> bool {
        name.parse::<ProviderKind>()
            .map(|kind| self.instantiate(kind).is_configured())
            .unwrap_or(false)
    }

    /// Credential-free provider first, then every configured provider
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.is_provider_configured(kind.as_str()))
            .collect()
    }
}
