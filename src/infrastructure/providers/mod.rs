pub mod dispatch;
pub mod elevenlabs_tts_provider;
pub mod google_tts_provider;
pub mod tts_provider;

pub use dispatch::synthesize_in_chunks;
pub use elevenlabs_tts_provider::{ElevenLabsSettings, ElevenLabsTtsProvider};
pub use google_tts_provider::{GoogleTtsProvider, GoogleTtsSettings};
pub use tts_provider::{ProviderError, TtsProvider};
