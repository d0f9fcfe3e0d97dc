//! Domain types shared by the chunking, encoding and fusion crates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// BM25-weighted sparse representation of a text.
///
/// `indices` and `values` are parallel arrays of the same length. Indices are
/// pairwise distinct vocabulary positions; values are strictly positive
/// (zero or negative term contributions are dropped, never stored).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

/// A numbered administrative instrument kind recognized by a header pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentType {
    /// PORTARIA — the most common instrument in municipal gazettes.
    Ordinance,
    /// DECRETO
    Decree,
    /// LEI
    Law,
    /// RESOLUÇÃO
    Resolution,
    /// INSTRUÇÃO NORMATIVA
    NormativeInstruction,
    /// EDITAL
    Notice,
    /// OFÍCIO
    OfficialLetter,
    /// PARECER
    Opinion,
}

impl InstrumentType {
    /// Portuguese label, as it appears in document headers.
    pub fn label(&self) -> &'static str {
        match self {
            InstrumentType::Ordinance => "PORTARIA",
            InstrumentType::Decree => "DECRETO",
            InstrumentType::Law => "LEI",
            InstrumentType::Resolution => "RESOLUÇÃO",
            InstrumentType::NormativeInstruction => "INSTRUÇÃO NORMATIVA",
            InstrumentType::Notice => "EDITAL",
            InstrumentType::OfficialLetter => "OFÍCIO",
            InstrumentType::Opinion => "PARECER",
        }
    }
}

/// A recognized instrument header: its kind plus the matched header text
/// (e.g. "PORTARIA Nº 123/2024").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRef {
    pub kind: InstrumentType,
    pub number: String,
}

/// Provenance attached to every chunk. Known fields are explicit; anything
/// caller-supplied rides in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document identifier (filename or external id), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Word-offset span of this chunk within the source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_span: Option<(usize, usize)>,
    /// Estimated total chunk count for the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<usize>,
    /// Set when this chunk was carved out of a recognized instrument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument: Option<InstrumentRef>,
    /// 1-based part number when an instrument span was split into sub-chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<usize>,
    /// Caller-supplied fields (folder paths, idempotency keys, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

/// A bounded span of document text, the unit of indexing and retrieval.
///
/// `chunk_index` is an ordering hint only; the structure-aware strategy
/// deliberately leaves gaps between its numbering ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    pub chunk_index: usize,
    pub metadata: ChunkMetadata,
}

/// Output of the extraction subsystem, consumed as chunker input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

/// One scored hit from either retrieval mode, and the unit fused results are
/// returned in. `score` is mode-specific but higher is always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: String,
    pub payload: serde_json::Value,
    pub score: f32,
}

/// A point submitted to the vector index service: one chunk with both its
/// dense embedding and its sparse vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    pub id: String,
    pub dense: Vec<f32>,
    pub sparse: SparseVector,
    pub payload: serde_json::Value,
}

/// Metadata equality filter applied by the vector index service.
pub type Filter = HashMap<String, String>;
