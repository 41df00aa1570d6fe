mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    controllers::{health, mcp::McpController, tts::TtsController, ws::WsController},
    domain::{session::SessionRegistry, tts::TtsService},
    error::AppError,
    infrastructure::config::Config,
};

/// Build the application router with all routes configured
pub fn build_router(
    config: &Config,
    tts_service: Arc<TtsService>,
    sessions: Arc<SessionRegistry>,
) -> Router {
    let mcp_controller = Arc::new(McpController::new(
        tts_service.clone(),
        sessions.clone(),
        config.port,
    ));
    let tts_controller = Arc::new(TtsController::new(
        tts_service.clone(),
        config.tts_max_text_length,
    ));
    let ws_controller = Arc::new(WsController::new(
        tts_service.clone(),
        sessions,
        config.tts_max_text_length,
    ));

    // Health routes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(tts_service);

    // MCP metadata routes
    let mcp_routes = Router::new()
        .route("/discovery", get(McpController::discovery))
        .route("/api/v1/info", get(McpController::info))
        .route("/api/v1/health", get(McpController::health))
        .route("/api/v1/register", post(McpController::register))
        .route("/api/v1/tts/config", get(McpController::tts_config))
        .with_state(mcp_controller);

    // TTS routes
    let tts_routes = Router::new()
        .route("/api/v1/tts", post(TtsController::synthesize))
        .route("/api/v1/tts/voices", get(TtsController::list_voices))
        .route("/api/v1/tts/providers", get(TtsController::list_providers))
        .with_state(tts_controller);

    // WebSocket routes
    let ws_routes = Router::new()
        .route("/ws", get(WsController::upgrade))
        .route("/api/v1/ws", get(WsController::upgrade))
        .with_state(ws_controller);

    Router::new()
        .merge(health_routes)
        .merge(mcp_routes)
        .merge(tts_routes)
        .merge(ws_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_service: Arc<TtsService>,
    sessions: Arc<SessionRegistry>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&config, tts_service, sessions);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Server shutting down...");
}
