use std::ops::Range;

/// Bounded slice of the input text sent to a provider in one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Ordinal position, contiguous from 0
    pub index: usize,
    /// Whitespace-trimmed content, at most `max_length` characters
    pub content: String,
    /// Byte range in the original text this chunk accounts for, including the
    /// whitespace trimmed from `content`. Ranges of all chunks tile the text.
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkingError {
    #[error("chunk length limit must be greater than zero")]
    ZeroLimit,
}

/// Split `text` into ordered chunks of at most `max_length` characters.
///
/// Cut points are searched backward from `start + max_length`:
/// 1. closest `". "`, `"! "`, `"? "` or newline, cutting right after the
///    punctuation so it stays with its sentence
/// 2. otherwise the closest space
/// 3. otherwise a hard cut at `max_length`
///
/// Lengths are counted in characters. Slices that trim to nothing are
/// dropped, except that whitespace-only input yields one empty chunk.
pub fn chunk_text(text: &str, max_length: usize) -> Result<Vec<TextChunk>, ChunkingError> {
    if max_length == 0 {
        return Err(ChunkingError::ZeroLimit);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    offsets.push(text.len());

    let total = chars.len();
    let mut chunks: Vec<TextChunk> = Vec::new();
    let mut start = 0;
    // First byte not yet owned by a chunk, so ranges always cover the whole text
    let mut range_start = 0;

    while start < total {
        let mut end = start + max_length;

        if end < total {
            end = find_sentence_break(&chars, start, end)
                .or_else(|| find_space(&chars, start, end))
                .unwrap_or(end);
        } else {
            end = total;
        }

        let content = text[offsets[start]..offsets[end]].trim();
        if !content.is_empty() {
            chunks.push(TextChunk {
                index: chunks.len(),
                content: content.to_string(),
                range: range_start..offsets[end],
            });
            range_start = offsets[end];
        } else if let Some(last) = chunks.last_mut() {
            last.range.end = offsets[end];
            range_start = offsets[end];
        }

        start = end;
    }

    if chunks.is_empty() {
        chunks.push(TextChunk {
            index: 0,
            content: String::new(),
            range: 0..text.len(),
        });
    }

    Ok(chunks)
}

/// Cut offset just after the closest sentence or paragraph break in the window
fn find_sentence_break(chars: &[char], start: usize, end: usize) -> Option<usize> {
    (start + 1..end).rev().find_map(|p| {
        let is_break = match chars[p] {
            '\n' => true,
            '.' | '!' | '?' => chars.get(p + 1) == Some(&' '),
            _ => false,
        };
        is_break.then_some(p + 1)
    })
}

/// Cut offset at the closest space in the window
fn find_space(chars: &[char], start: usize, end: usize) -> Option<usize> {
    (start + 1..=end).rev().find(|&p| chars[p] == ' ')
}
