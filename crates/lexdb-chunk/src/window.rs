//! Generic sliding-window chunking over whitespace-separated words.

use lexdb_core::config::ChunkingConfig;
use lexdb_core::types::{ChunkMetadata, TextChunk};
use lexdb_core::Result;

/// Split text into `chunk_size`-word windows advancing by
/// `chunk_size - chunk_overlap` words.
///
/// Every chunk's metadata records its word-offset span and the estimated
/// total `ceil(words / stride)`. Fails fast on `chunk_overlap >= chunk_size`;
/// empty input yields an empty list, never an error.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<TextChunk>> {
    let config = ChunkingConfig { chunk_size, chunk_overlap };
    config.validate()?;

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let stride = config.stride();
    let estimated_total = words.len().div_ceil(stride);

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chunk_index = 0;
    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        chunks.push(TextChunk {
            text: words[start..end].join(" "),
            chunk_index,
            metadata: ChunkMetadata {
                word_span: Some((start, end)),
                total_chunks: Some(estimated_total),
                ..Default::default()
            },
        });
        start += stride;
        chunk_index += 1;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdb_core::Error;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 500, 50).expect("chunk").is_empty());
        assert!(chunk_text(" \n ", 500, 50).expect("chunk").is_empty());
    }

    #[test]
    fn overlap_equal_to_size_fails_fast() {
        assert!(matches!(chunk_text("a b c", 10, 10), Err(Error::InvalidConfig(_))));
        assert!(matches!(chunk_text("a b c", 10, 11), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn no_chunk_exceeds_the_window() {
        let text = (0..1237).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_text(&text, 500, 50).expect("chunk");
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.text.split_whitespace().count() <= 500);
        }
    }

    #[test]
    fn adjacent_windows_overlap_by_the_configured_amount() {
        let text = (0..200).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_text(&text, 100, 20).expect("chunk");
        let (s0, e0) = chunks[0].metadata.word_span.expect("span");
        let (s1, _) = chunks[1].metadata.word_span.expect("span");
        assert_eq!(e0 - s1, 20);
        assert_eq!(s0, 0);
    }
}
