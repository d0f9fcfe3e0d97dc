#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! lexdb-chunk
//!
//! Splits extracted document text into overlapping chunks. Two strategies:
//! a generic sliding window over words, and a structure-aware strategy for
//! administrative gazettes that carves out numbered instruments (portarias,
//! decretos, ...) before falling back to sentence-aware windows. Outputs of
//! both may be pooled and deduplicated.

pub mod dedup;
pub mod legal;
pub mod sentence;
pub mod window;

pub use dedup::dedupe_chunks;
pub use legal::{chunk_smart, extract_legal_spans, LegalSpan};
pub use window::chunk_text;
