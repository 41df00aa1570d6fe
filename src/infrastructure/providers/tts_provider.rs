use crate::domain::tts::{ChunkingError, ProviderKind, VoiceDescriptor, VoiceOptions, VoiceSettings};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Required credential missing, never retried
    #[error("{} is not configured: {reason}", .provider.display_name())]
    NotConfigured {
        provider: ProviderKind,
        reason: String,
    },
    /// Network failure, non-success status or malformed response
    #[error("{message}")]
    Transport {
        provider: ProviderKind,
        message: String,
    },
    #[error("invalid voice options: {0}")]
    InvalidOptions(String),
    #[error("synthesis cancelled")]
    Cancelled,
    #[error(transparent)]
    Chunking(#[from] ChunkingError),
}

/// Capability set every TTS provider exposes.
///
/// Implementations are responsible for:
/// - Enforcing the provider's per-call text length limit
/// - Splitting text into chunks and dispatching them concurrently
/// - Reassembling audio in chunk order
/// - Mapping the remote voice catalog to [`VoiceDescriptor`]
///
/// An instance owns its [`VoiceOptions`]. Instances are created per request
/// by the registry, so mutating options never affects another request.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Maximum characters accepted by one remote call
    fn max_text_length(&self) -> usize;

    /// Pure check over required configuration, no network access
    fn is_configured(&self) -> bool;

    fn voice_options(&self) -> VoiceOptions;

    /// Replace the options wholesale. Fails if they belong to another provider.
    fn set_voice_options(&mut self, options: VoiceOptions) -> Result<(), ProviderError>;

    /// Layer caller supplied knobs over the current options
    fn apply_settings(&mut self, settings: &VoiceSettings) -> Result<(), ProviderError>;

    /// Synthesize `text` to MP3 bytes
    ///
    /// # Errors
    /// Fails when the provider is not configured, when any chunk call fails
    /// (no partial audio is returned) or when `cancel` fires.
    async fn synthesize(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ProviderError>;

    /// Remote catalog lookup. Providers without a remote catalog return
    /// their static list.
    async fn fetch_voices(&self) -> Result<Vec<VoiceDescriptor>, ProviderError>;

    /// Fixed catalog used when the remote one is unavailable
    fn fallback_voices(&self) -> Vec<VoiceDescriptor>;
}
