//! Structure-aware chunking for numbered administrative instruments.
//!
//! Municipal gazettes concatenate many instruments into one document. Each
//! instrument opens with a recognizable header ("PORTARIA Nº 123/2024",
//! "DECRETO Nº 45/2023", ...), so the text is scanned with one pattern per
//! instrument type and split at header boundaries. Adding an instrument type
//! is a table entry, not new control flow.

use regex::Regex;
use std::sync::LazyLock;

use lexdb_core::config::ChunkingConfig;
use lexdb_core::types::{ChunkMetadata, InstrumentRef, InstrumentType, TextChunk};
use lexdb_core::Result;

use crate::dedup::dedupe_chunks;
use crate::sentence::sentence_chunks;

/// Hard cap on a single instrument span, in characters. Headers buried in
/// scanned-and-OCRed gazettes sometimes never see a follow-up header, and an
/// uncapped span would swallow the rest of the document.
const MAX_SPAN_CHARS: usize = 3000;

/// Spans up to this many words are emitted as a single chunk.
const SINGLE_CHUNK_WORD_LIMIT: usize = 600;
/// Longer spans are split into sub-chunks of this many words...
const SUB_CHUNK_WORDS: usize = 500;
/// ...advancing by this stride (100 words of overlap between parts).
const SUB_CHUNK_STRIDE: usize = 400;

/// Instrument numbering for sub-chunks leaves gaps of 100 per span, so part
/// indices never collide with the sentence pass (which starts at 1000... the
/// ordering hint is explicitly non-contiguous).
const PARTS_PER_SPAN: usize = 100;

static HEADER_TABLE: LazyLock<Vec<(InstrumentType, Regex)>> = LazyLock::new(|| {
    let table: [(InstrumentType, &str); 8] = [
        (InstrumentType::Ordinance, r"PORT[AÁ]RIA\s*N[º°]?\s*\d+/\d+"),
        (InstrumentType::Decree, r"DECRETO\s*N[º°]?\s*\d+/\d+"),
        (InstrumentType::Law, r"LEI\s*N[º°]?\s*\d+/\d+"),
        (InstrumentType::Resolution, r"RESOLU[ÇC][ÃA]O\s*N[º°]?\s*\d+/\d+"),
        (
            InstrumentType::NormativeInstruction,
            r"INSTRU[ÇC][ÃA]O\s*NORMATIVA\s*N[º°]?\s*\d+/\d+",
        ),
        (InstrumentType::Notice, r"EDITAL\s*N[º°]?\s*\d+/\d+"),
        (InstrumentType::OfficialLetter, r"OF[ÍI]CIO\s*N[º°]?\s*\d+/\d+"),
        (InstrumentType::Opinion, r"PARECER\s*N[º°]?\s*\d+/\d+"),
    ];
    table
        .into_iter()
        .map(|(kind, pattern)| {
            (kind, Regex::new(&format!("(?i){pattern}")).expect("instrument pattern compiles"))
        })
        .collect()
});

static SECTION_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^Art\.\s*\d+",
        r"(?m)^§\s*\d+",
        r"(?m)^CAPÍTULO",
        r"(?m)^SEÇÃO",
        r"(?m)^ANEXO",
        r"(?m)^RESOLVE:",
        r"(?m)^CONSIDERANDO",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("section marker compiles"))
    .collect()
});

const RESOLVE_MARKER: &str = "RESOLVE:";

/// One recognized instrument, derived transiently while scanning and consumed
/// into chunks immediately afterwards.
#[derive(Debug, Clone)]
pub struct LegalSpan {
    pub instrument: InstrumentRef,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

fn next_header(text: &str, from: usize) -> Option<usize> {
    HEADER_TABLE
        .iter()
        .filter_map(|(_, regex)| regex.find(&text[from..]).map(|m| from + m.start()))
        .min()
}

fn next_section(text: &str, from: usize) -> Option<usize> {
    SECTION_MARKERS
        .iter()
        .filter_map(|regex| regex.find(&text[from..]).map(|m| from + m.start()))
        .min()
}

/// Shrink `end` so the span holds at most `max_chars` characters, landing on
/// a char boundary.
fn cap_span(text: &str, start: usize, end: usize, max_chars: usize) -> usize {
    match text[start..end].char_indices().nth(max_chars) {
        Some((offset, _)) => start + offset,
        None => end,
    }
}

/// Scan the text with every instrument-header pattern and derive one span per
/// match. A span runs to the next header of any type (or end of text), capped
/// at [`MAX_SPAN_CHARS`]; when a "RESOLVE:" marker occurs inside it, the span
/// shrinks to the nearest following section marker if that comes earlier.
pub fn extract_legal_spans(text: &str) -> Vec<LegalSpan> {
    let mut spans = Vec::new();
    for (kind, regex) in HEADER_TABLE.iter() {
        for header in regex.find_iter(text) {
            let start = header.start();
            let mut end = next_header(text, header.end()).unwrap_or(text.len());

            if let Some(resolve) = text[start..].find(RESOLVE_MARKER).map(|i| start + i) {
                if resolve < end {
                    if let Some(section) = next_section(text, resolve + RESOLVE_MARKER.len()) {
                        if section < end {
                            end = section;
                        }
                    }
                }
            }

            let end = cap_span(text, start, end, MAX_SPAN_CHARS);
            spans.push(LegalSpan {
                instrument: InstrumentRef { kind: *kind, number: header.as_str().to_string() },
                start,
                end,
                text: text[start..end].to_string(),
            });
        }
    }
    spans
}

fn chunk_legal_spans(spans: &[LegalSpan]) -> Vec<TextChunk> {
    let mut chunks = Vec::new();
    for (span_index, span) in spans.iter().enumerate() {
        let words: Vec<&str> = span.text.split_whitespace().collect();

        if words.len() <= SINGLE_CHUNK_WORD_LIMIT {
            chunks.push(TextChunk {
                text: span.text.clone(),
                chunk_index: span_index,
                metadata: ChunkMetadata {
                    instrument: Some(span.instrument.clone()),
                    ..Default::default()
                },
            });
            continue;
        }

        let mut start = 0;
        let mut part = 1;
        while start < words.len() {
            let end = (start + SUB_CHUNK_WORDS).min(words.len());
            let body = words[start..end].join(" ");
            chunks.push(TextChunk {
                text: format!("{} (Parte {})\n\n{}", span.instrument.number, part, body),
                chunk_index: span_index * PARTS_PER_SPAN + (part - 1),
                metadata: ChunkMetadata {
                    instrument: Some(span.instrument.clone()),
                    part: Some(part),
                    ..Default::default()
                },
            });
            start += SUB_CHUNK_STRIDE;
            part += 1;
        }
    }
    chunks
}

/// Structure-aware chunking: instrument spans first, then an independent
/// sentence-aware generic pass over the whole text, pooled and deduplicated.
///
/// Malformed or empty input yields an empty list, never an error; only a bad
/// size/overlap configuration fails.
pub fn chunk_smart(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<TextChunk>> {
    ChunkingConfig { chunk_size, chunk_overlap }.validate()?;

    let spans = extract_legal_spans(text);
    let mut chunks = chunk_legal_spans(&spans);
    chunks.extend(sentence_chunks(text, chunk_size, chunk_overlap));
    Ok(dedupe_chunks(chunks))
}
