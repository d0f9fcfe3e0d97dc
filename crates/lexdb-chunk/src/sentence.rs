//! Sentence-aware generic pass used by the structure-aware strategy.
//!
//! Sentences are cut at terminal punctuation, except that a "sentence" ending
//! in a citation fragment ("Art.", "Inc.", "§ 2", "nº") is merged into the
//! following one — legal text is full of abbreviation periods that would
//! otherwise split citations in half.

use regex::Regex;
use std::sync::LazyLock;

use lexdb_core::types::{ChunkMetadata, TextChunk};

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern compiles"));

static CITATION_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\bArt|\bInc|§|n[º°])\s*\d*\.?\s*$").expect("citation pattern compiles")
});

/// Sentence pass chunks number from 1000 upward so their indices never
/// collide with instrument-span chunks.
const SENTENCE_CHUNK_BASE: usize = 1000;

/// Split text into sentences, merging citation fragments forward.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut carry = String::new();

    for m in SENTENCE.find_iter(text) {
        let sentence = m.as_str();
        if CITATION_TAIL.is_match(sentence) {
            carry.push_str(sentence);
            carry.push(' ');
        } else if carry.is_empty() {
            sentences.push(sentence.to_string());
        } else {
            carry.push_str(sentence);
            sentences.push(std::mem::take(&mut carry));
        }
    }

    if !carry.is_empty() {
        sentences.push(carry.trim().to_string());
    }

    sentences
}

/// Accumulate sentences into chunks of at most `chunk_size` words, seeding
/// each new chunk with the trailing `chunk_overlap` words of the previous
/// one. Sizes are assumed validated by the caller.
pub fn sentence_chunks(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<TextChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut word_count = 0;
    let mut chunk_index = SENTENCE_CHUNK_BASE;

    let mut flush = |current: &mut Vec<String>, word_count: &mut usize, chunk_index: &mut usize| {
        let joined = current.join(" ");
        chunks.push(TextChunk {
            text: joined.clone(),
            chunk_index: *chunk_index,
            metadata: ChunkMetadata::default(),
        });
        *chunk_index += 1;

        // Carry the trailing overlap words into the next chunk.
        let words: Vec<&str> = joined.split_whitespace().collect();
        let overlap = chunk_overlap.min(words.len());
        current.clear();
        if overlap > 0 {
            current.push(words[words.len() - overlap..].join(" "));
        }
        *word_count = overlap;
    };

    for sentence in split_sentences(text) {
        let words = sentence.split_whitespace().count();
        if word_count + words > chunk_size && !current.is_empty() {
            flush(&mut current, &mut word_count, &mut chunk_index);
        }
        current.push(sentence);
        word_count += words;
    }

    if !current.is_empty() {
        let joined = current.join(" ");
        chunks.push(TextChunk {
            text: joined,
            chunk_index,
            metadata: ChunkMetadata::default(),
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sentences_split_at_terminal_punctuation() {
        let sentences = split_sentences("Primeira frase. Segunda frase! Terceira?");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn citation_fragments_merge_forward() {
        let sentences = split_sentences("Conforme o Art. 5 da Constituição, todos são iguais.");
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].contains("Art. 5"));
    }

    #[test]
    fn no_terminal_punctuation_means_no_sentences() {
        assert!(split_sentences("texto sem pontuação final").is_empty());
    }

    #[test]
    fn long_text_flushes_at_the_word_budget() {
        let sentence = format!("{}.", "palavra ".repeat(40).trim());
        let text = sentence.repeat(5); // 200 words total
        let chunks = sentence_chunks(&text, 100, 10);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            // Budget plus at most one overflowing sentence.
            assert!(chunk.text.split_whitespace().count() <= 100 + 40);
        }
    }
}
