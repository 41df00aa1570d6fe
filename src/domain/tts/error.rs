use super::model::ProviderKind;
use crate::error::AppError;
use crate::infrastructure::providers::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("Unsupported TTS provider: {0}")]
    UnsupportedProvider(String),
    #[error("{} is not configured: {message}", .provider.display_name())]
    Configuration {
        provider: ProviderKind,
        message: String,
    },
    #[error("Failed to generate audio with {}: {message}", .provider.display_name())]
    Provider {
        provider: ProviderKind,
        message: String,
    },
    #[error("synthesis cancelled")]
    Cancelled,
    #[error("text chunking failed: {0}")]
    Chunking(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ProviderError> for TtsServiceError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured { provider, reason } => TtsServiceError::Configuration {
                provider,
                message: reason,
            },
            ProviderError::Transport { provider, message } => {
                TtsServiceError::Provider { provider, message }
            }
            ProviderError::InvalidOptions(msg) => TtsServiceError::Invalid(msg),
            ProviderError::Cancelled => TtsServiceError::Cancelled,
            ProviderError::Chunking(e) => TtsServiceError::Chunking(e.to_string()),
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            e @ TtsServiceError::UnsupportedProvider(_) => AppError::BadRequest(e.to_string()),
            e @ TtsServiceError::Configuration { .. } => {
                AppError::ServiceUnavailable(e.to_string())
            }
            e @ TtsServiceError::Provider { .. } => AppError::ExternalService(e.to_string()),
            e @ (TtsServiceError::Cancelled | TtsServiceError::Chunking(_)) => {
                AppError::Internal(e.to_string())
            }
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
