//! WebSocket wire messages.
//!
//! Every frame is a JSON text frame carrying a `type` discriminator.

use crate::domain::tts::{ProviderKind, VoiceSettings};
use serde::{Deserialize, Serialize};

/// Client to server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncomingMessage {
    Text(TextMessage),
    Cancel {
        #[serde(rename = "messageId")]
        message_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "messageId")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default, rename = "voiceOptions")]
    pub voice_options: Option<VoiceSettings>,
}

/// Server to client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    Connection {
        status: &'static str,
        #[serde(rename = "clientId")]
        client_id: String,
    },
    Audio {
        format: &'static str,
        /// Base64 encoded MP3
        data: String,
        #[serde(rename = "messageId")]
        message_id: String,
        provider: ProviderKind,
    },
    Cancelled {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    Error {
        message: String,
        #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
}

impl OutgoingMessage {
    pub fn error(message: impl Into<String>, message_id: Option<String>) -> Self {
        OutgoingMessage::Error {
            message: message.into(),
            message_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MessageError {
    #[error("Failed to process message")]
    Malformed,
    #[error("Unsupported message type")]
    UnsupportedType(Option<String>),
}

/// Parse a client frame, telling unknown types apart from broken payloads
pub fn parse_incoming(raw: &str) -> Result<IncomingMessage, MessageError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|_| MessageError::Malformed)?;

    match value.get("type").and_then(|t| t.as_str()) {
        Some("text") | Some("cancel") => {
            serde_json::from_value(value).map_err(|_| MessageError::Malformed)
        }
        other => Err(MessageError::UnsupportedType(other.map(str::to_string))),
    }
}
