//! First-wins deduplication over pooled chunk sets.

use std::collections::HashSet;

use lexdb_core::types::TextChunk;

/// How much of the normalized text identifies a chunk. Two chunks sharing
/// their first 100 normalized characters are treated as duplicates.
const DEDUP_PREFIX_CHARS: usize = 100;

/// Drop later chunks whose normalized prefix (lowercased, whitespace
/// collapsed) was already seen. Both chunking strategies run over the same
/// document, so an instrument span and a sentence-pass window frequently
/// cover identical text; the first occurrence wins.
pub fn dedupe_chunks(chunks: Vec<TextChunk>) -> Vec<TextChunk> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for chunk in chunks {
        let normalized = chunk
            .text
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let key: String = normalized.chars().take(DEDUP_PREFIX_CHARS).collect();
        if seen.insert(key) {
            unique.push(chunk);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdb_core::types::ChunkMetadata;

    fn chunk(text: &str, index: usize) -> TextChunk {
        TextChunk { text: text.to_string(), chunk_index: index, metadata: ChunkMetadata::default() }
    }

    #[test]
    fn verbatim_duplicates_survive_once() {
        let paragraph = "palavra ".repeat(150);
        let pooled = vec![chunk(&paragraph, 0), chunk(&paragraph, 1000)];
        let unique = dedupe_chunks(pooled);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].chunk_index, 0, "first occurrence wins");
    }

    #[test]
    fn whitespace_and_case_do_not_defeat_dedup() {
        let a = chunk("PORTARIA Nº 1/2024  nomeia   o servidor", 0);
        let b = chunk("portaria nº 1/2024 nomeia o servidor", 1);
        assert_eq!(dedupe_chunks(vec![a, b]).len(), 1);
    }

    #[test]
    fn distinct_chunks_all_survive() {
        let pooled = vec![chunk("primeiro texto.", 0), chunk("segundo texto.", 1)];
        assert_eq!(dedupe_chunks(pooled).len(), 2);
    }
}
