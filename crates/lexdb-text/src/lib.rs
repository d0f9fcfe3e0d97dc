#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! lexdb-text
//!
//! Lexical side of the engine: token normalization, the corpus statistics
//! store, and the BM25 sparse encoder. Everything here is pure computation;
//! nothing suspends.

pub mod normalize;
pub mod sparse;
pub mod stats;

pub use normalize::normalize;
pub use sparse::encode;
pub use stats::CorpusIndex;
