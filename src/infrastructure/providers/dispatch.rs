use super::tts_provider::ProviderError;
use crate::domain::tts::{chunk_text, ProviderKind, TextChunk};
use futures::{stream, StreamExt, TryStreamExt};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Split `text` for a provider and synthesize every chunk, at most
/// `max_concurrency` calls in flight.
///
/// Results are concatenated in chunk order whatever order the calls complete
/// in. The first failing chunk fails the whole synthesis and drops the calls
/// still in flight. `cancel` is checked before each dispatch and raced
/// against every call.
pub async fn synthesize_in_chunks<F, Fut>(
    provider: ProviderKind,
    text: &str,
    max_length: usize,
    max_concurrency: usize,
    cancel: &CancellationToken,
    synthesize_chunk: F,
) -> Result<Vec<u8>, ProviderError>
where
    F: Fn(TextChunk) -> Fut,
    Fut: Future<Output = Result<Vec<u8>, ProviderError>>,
{
    if cancel.is_cancelled() {
        return Err(ProviderError::Cancelled);
    }

    let chunks = chunk_text(text, max_length)?;
    let chunk_count = chunks.len();

    tracing::info!(
        provider = %provider,
        chunk_count = chunk_count,
        text_length = text.chars().count(),
        max_length = max_length,
        "Text split into chunks"
    );

    let buffers: Vec<Vec<u8>> = stream::iter(chunks)
        .map(|chunk| {
            let index = chunk.index;
            let call = synthesize_chunk(chunk);
            async move {
                if cancel.is_cancelled() {
                    return Err(ProviderError::Cancelled);
                }

                let audio: Vec<u8> = tokio::select! {
                    _ = cancel.cancelled() => Err(ProviderError::Cancelled),
                    result = call => result,
                }?;

                tracing::debug!(
                    provider = %provider,
                    chunk_index = index,
                    audio_size = audio.len(),
                    "Chunk synthesized"
                );

                Ok(audio)
            }
        })
        .buffered(max_concurrency.max(1))
        .try_collect()
        .await?;

    Ok(buffers.concat())
}
