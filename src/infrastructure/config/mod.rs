use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Provider selection
    pub tts_provider: Option<String>,
    // Eleven Labs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_default_voice: String,
    pub elevenlabs_model: String,
    pub elevenlabs_api_url: String,
    // Google translate TTS
    pub google_tts_language: String,
    pub google_tts_host: String,
    // Synthesis limits
    pub tts_request_timeout_secs: u64,
    pub tts_max_concurrent_chunks: usize,
    pub tts_max_text_length: usize,
    // Voice catalog cache
    pub voice_cache_enabled: bool,
    pub voice_cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let config = Config {
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "3000").parse()?,
            environment: match var_or("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var_or("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts_provider: var("TTS_PROVIDER"),
            elevenlabs_api_key: var("ELEVENLABS_API_KEY"),
            elevenlabs_default_voice: var_or("ELEVENLABS_DEFAULT_VOICE", "21m00Tcm4TlvDq8ikWAM"),
            elevenlabs_model: var_or("ELEVENLABS_MODEL", "eleven_multilingual_v2"),
            elevenlabs_api_url: var_or("ELEVENLABS_API_URL", "https://api.elevenlabs.io/v1"),
            google_tts_language: var_or("GOOGLE_TTS_LANGUAGE", "en"),
            google_tts_host: var_or("GOOGLE_TTS_HOST", "https://translate.google.com"),
            tts_request_timeout_secs: var_or("TTS_REQUEST_TIMEOUT_SECS", "10").parse()?,
            tts_max_concurrent_chunks: var_or("TTS_MAX_CONCURRENT_CHUNKS", "4").parse()?,
            tts_max_text_length: var_or("TTS_MAX_TEXT_LENGTH", "10000").parse()?,
            voice_cache_enabled: var_or("VOICE_CACHE_ENABLED", "true").to_lowercase() == "true",
            voice_cache_ttl_secs: var_or("VOICE_CACHE_TTL_SECS", "3600").parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
