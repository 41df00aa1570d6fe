pub mod chunker;
pub mod error;
pub mod model;
pub mod registry;
pub mod service;
pub mod text;

pub use chunker::{chunk_text, ChunkingError, TextChunk};
pub use error::TtsServiceError;
pub use model::{
    AudioResult, ElevenLabsVoiceOptions, GoogleVoiceOptions, ProviderKind, SynthesisRequest,
    UnknownProvider, VoiceDescriptor, VoiceOptions, VoiceSettings, AUDIO_FORMAT,
};
pub use registry::ProviderRegistry;
pub use service::{TtsService, TtsServiceApi};
pub use text::sanitize_text;
