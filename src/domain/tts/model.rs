use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audio container produced by every provider
pub const AUDIO_FORMAT: &str = "mp3";

/// TTS providers known to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Free translate-backed engine, no credential required
    Google,
    /// Commercial voice API, requires an API key
    ElevenLabs,
}

impl ProviderKind {
    /// All providers, credential-free provider first
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Google, ProviderKind::ElevenLabs];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::ElevenLabs => "elevenlabs",
        }
    }

    /// Human readable name used in user facing error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "Google TTS",
            ProviderKind::ElevenLabs => "Eleven Labs TTS",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unknown provider name, carries the offending value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "elevenlabs" => Ok(ProviderKind::ElevenLabs),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Uniform voice metadata regardless of source provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub id: String,
    pub name: String,
    pub language: String,
    pub provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl VoiceDescriptor {
    pub fn new(id: &str, name: &str, language: &str, provider: ProviderKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            language: language.to_string(),
            provider,
            gender: None,
            preview_url: None,
        }
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleVoiceOptions {
    pub voice: String,
    pub language: String,
    pub pitch: f32,
    pub rate: f32,
    pub slow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevenLabsVoiceOptions {
    pub voice_id: String,
    pub model_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

/// Per-provider configuration snapshot owned by an adapter instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoiceOptions {
    Google(GoogleVoiceOptions),
    ElevenLabs(ElevenLabsVoiceOptions),
}

impl VoiceOptions {
    pub fn provider(&self) -> ProviderKind {
        match self {
            VoiceOptions::Google(_) => ProviderKind::Google,
            VoiceOptions::ElevenLabs(_) => ProviderKind::ElevenLabs,
        }
    }

    pub fn voice_id(&self) -> &str {
        match self {
            VoiceOptions::Google(options) => &options.voice,
            VoiceOptions::ElevenLabs(options) => &options.voice_id,
        }
    }
}

/// Caller supplied knobs. Every field is optional and only the knobs the
/// selected provider understands are applied; the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "voiceId",
        alias = "voice_id"
    )]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "modelId",
        alias = "model_id"
    )]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "similarityBoost")]
    pub similarity_boost: Option<f32>,
}

/// Input of a single synthesis
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub provider: Option<String>,
    pub voice_settings: VoiceSettings,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider: None,
            voice_settings: VoiceSettings::default(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = settings;
        self
    }
}

/// Synthesized audio, ownership moves to the caller
#[derive(Debug, Clone)]
pub struct AudioResult {
    pub audio_data: Vec<u8>,
    pub format: &'static str,
    pub provider: ProviderKind,
    pub voice_options: VoiceOptions,
    pub char_count: usize,
    pub chunk_count: usize,
}
