use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use voice_mcp_backend::domain::session::SessionRegistry;
use voice_mcp_backend::domain::tts::{ProviderRegistry, TtsService};
use voice_mcp_backend::infrastructure::config::{Config, Environment, LogFormat};
use voice_mcp_backend::infrastructure::http::build_router;
use wiremock::MockServer;

pub mod ws_client;

use api_client::TestClient;

pub const TEST_API_KEY: &str = "test-elevenlabs-key";

pub struct TestContext {
    pub client: TestClient,
    pub base_url: String,
    /// Stands in for the translate TTS host
    pub google: MockServer,
    /// Stands in for the Eleven Labs API
    pub elevenlabs: MockServer,
}

impl TestContext {
    /// Context whose Eleven Labs provider has no credential
    pub async fn without_elevenlabs_key() -> Self {
        Self::start(None, None).await
    }

    pub async fn with_default_provider(provider: &str) -> Self {
        Self::start(Some(TEST_API_KEY), Some(provider)).await
    }

    async fn start(api_key: Option<&str>, default_provider: Option<&str>) -> Self {
        let google = MockServer::start().await;
        let elevenlabs = MockServer::start().await;

        let config = test_config(&google, &elevenlabs, api_key, default_provider);

        let registry =
            Arc::new(ProviderRegistry::from_config(&config).expect("Failed to build registry"));
        let tts_service = Arc::new(TtsService::new(
            registry,
            config.voice_cache_enabled,
            Duration::from_secs(config.voice_cache_ttl_secs),
        ));
        let sessions = Arc::new(SessionRegistry::new());
        let app = build_router(&config, tts_service, sessions);

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            client: TestClient::new(&base_url),
            base_url,
            google,
            elevenlabs,
        }
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.replacen("http://", "ws://", 1), path)
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { TestContext::start(Some(TEST_API_KEY), None).await }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Mock servers shut down on drop
        }
    }
}

fn test_config(
    google: &MockServer,
    elevenlabs: &MockServer,
    api_key: Option<&str>,
    default_provider: Option<&str>,
) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0, // Will be assigned by the OS
        environment: Environment::Development,
        log_format: LogFormat::Pretty,
        tts_provider: default_provider.map(str::to_string),
        elevenlabs_api_key: api_key.map(str::to_string),
        elevenlabs_default_voice: "21m00Tcm4TlvDq8ikWAM".to_string(),
        elevenlabs_model: "eleven_multilingual_v2".to_string(),
        elevenlabs_api_url: elevenlabs.uri(),
        google_tts_language: "en".to_string(),
        google_tts_host: google.uri(),
        tts_request_timeout_secs: 5,
        tts_max_concurrent_chunks: 4,
        tts_max_text_length: 10000,
        // Catalog caching is covered by the service unit tests
        voice_cache_enabled: false,
        voice_cache_ttl_secs: 60,
    }
}
