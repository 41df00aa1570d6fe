use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_mcp_backend::domain::session::SessionRegistry;
use voice_mcp_backend::domain::tts::{ProviderRegistry, TtsService};
use voice_mcp_backend::infrastructure::config::{Config, LogFormat};
use voice_mcp_backend::infrastructure::http::start_http_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Voice MCP Backend on {}:{}",
        config.host,
        config.port
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Provider registry (shared HTTP client with the provider timeout)
    let registry = Arc::new(ProviderRegistry::from_config(&config)?);
    let providers = registry.available_providers();
    tracing::info!(
        default_provider = %registry.default_provider(),
        providers = ?providers,
        timeout_secs = config.tts_request_timeout_secs,
        max_concurrent_chunks = config.tts_max_concurrent_chunks,
        "TTS providers initialized"
    );

    if config.elevenlabs_api_key.is_none() {
        tracing::info!("ELEVENLABS_API_KEY not set, Eleven Labs provider disabled");
    }

    // 2. Services
    let tts_service = Arc::new(TtsService::new(
        registry,
        config.voice_cache_enabled,
        Duration::from_secs(config.voice_cache_ttl_secs),
    ));
    let sessions = Arc::new(SessionRegistry::new());

    // Start HTTP server with all routes
    start_http_server(Arc::new(config), tts_service, sessions).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voice_mcp_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voice_mcp_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
