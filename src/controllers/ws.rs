use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::{
    session::{parse_incoming, IncomingMessage, OutgoingMessage, SessionRegistry, TextMessage},
    tts::{sanitize_text, SynthesisRequest, TtsService, TtsServiceApi, TtsServiceError},
};

const CHANNEL_BUFFER_SIZE: usize = 64;

/// Bidirectional text-in / audio-out channel for the desktop client
pub struct WsController {
    tts_service: Arc<TtsService>,
    sessions: Arc<SessionRegistry>,
    max_text_length: usize,
}

impl WsController {
    pub fn new(
        tts_service: Arc<TtsService>,
        sessions: Arc<SessionRegistry>,
        max_text_length: usize,
    ) -> Self {
        Self {
            tts_service,
            sessions,
            max_text_length,
        }
    }

    /// GET /ws, GET /api/v1/ws - Upgrade to WebSocket
    pub async fn upgrade(
        ws: WebSocketUpgrade,
        State(controller): State<Arc<WsController>>,
    ) -> Response {
        ws.on_upgrade(move |socket| controller.handle_socket(socket))
    }

    async fn handle_socket(self: Arc<Self>, socket: WebSocket) {
        let (client_id, _client_token) = self.sessions.register().await;
        let (mut sender, mut receiver) = socket.split();
        let (message_tx, mut message_rx) = mpsc::channel::<OutgoingMessage>(CHANNEL_BUFFER_SIZE);

        // Single writer, synthesis tasks reply through the channel
        let sender_task = tokio::spawn(async move {
            while let Some(message) = message_rx.recv().await {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize outgoing message: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(json)).await {
                    tracing::warn!("Failed to send WebSocket message: {}", e);
                    break;
                }
            }
        });

        let _ = message_tx
            .send(OutgoingMessage::Connection {
                status: "connected",
                client_id: client_id.clone(),
            })
            .await;

        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(raw)) => self.handle_message(&client_id, &raw, &message_tx).await,
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(client_id = %client_id, "WebSocket error: {}", e);
                    break;
                }
            }
        }

        // Cancels every synthesis still running for this client
        self.sessions.unregister(&client_id).await;
        drop(message_tx);
        sender_task.abort();
    }

    async fn handle_message(
        &self,
        client_id: &str,
        raw: &str,
        message_tx: &mpsc::Sender<OutgoingMessage>,
    ) {
        match parse_incoming(raw) {
            Ok(IncomingMessage::Text(message)) => {
                self.start_synthesis(client_id, message, message_tx).await
            }
            Ok(IncomingMessage::Cancel { message_id }) => {
                let reply = if self.sessions.cancel(client_id, &message_id).await {
                    OutgoingMessage::Cancelled { message_id }
                } else {
                    OutgoingMessage::error(
                        format!("No synthesis in progress for messageId: {}", message_id),
                        Some(message_id),
                    )
                };
                let _ = message_tx.send(reply).await;
            }
            Err(e) => {
                tracing::warn!(client_id = %client_id, error = %e, "Rejected WebSocket message");
                let _ = message_tx.send(OutgoingMessage::error(e.to_string(), None)).await;
            }
        }
    }

    async fn start_synthesis(
        &self,
        client_id: &str,
        message: TextMessage,
        message_tx: &mpsc::Sender<OutgoingMessage>,
    ) {
        let message_id = message
            .message_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let text = sanitize_text(&message.content);

        if text.is_empty() {
            let _ = message_tx
                .send(OutgoingMessage::error(
                    "Missing required field: content",
                    Some(message_id),
                ))
                .await;
            return;
        }
        if text.chars().count() > self.max_text_length {
            let _ = message_tx
                .send(OutgoingMessage::error(
                    format!("Text must be {} characters or less", self.max_text_length),
                    Some(message_id),
                ))
                .await;
            return;
        }

        let Some(tracked) = self.sessions.track(client_id, &message_id).await else {
            return;
        };

        tracing::info!(
            client_id = %client_id,
            message_id = %message_id,
            text_length = text.chars().count(),
            "WebSocket synthesis request"
        );

        let mut request = SynthesisRequest::new(text)
            .with_voice_settings(message.voice_options.unwrap_or_default());
        if let Some(provider) = message.provider {
            request = request.with_provider(provider);
        }

        let tts_service = Arc::clone(&self.tts_service);
        let sessions = Arc::clone(&self.sessions);
        let client_id = client_id.to_string();
        let message_tx = message_tx.clone();

        // Synthesis runs off the read loop so cancel frames are still received
        tokio::spawn(async move {
            let result = tts_service.synthesize(request, &tracked.token).await;
            sessions.finish(&client_id, &message_id, &tracked).await;

            let reply = match result {
                Ok(audio) => OutgoingMessage::Audio {
                    format: audio.format,
                    data: BASE64.encode(&audio.audio_data),
                    message_id,
                    provider: audio.provider,
                },
                // The cancel frame already got its reply
                Err(TtsServiceError::Cancelled) => return,
                Err(e) => OutgoingMessage::error(e.to_string(), Some(message_id)),
            };
            let _ = message_tx.send(reply).await;
        });
    }
}
