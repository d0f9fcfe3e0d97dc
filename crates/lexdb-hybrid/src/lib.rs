#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! lexdb-hybrid
//!
//! The orchestrating engine: feeds chunks through the corpus statistics
//! store, the sparse encoder and the embedding provider into the vector index
//! service, and fuses dense/sparse candidate lists into one ranking. Also
//! ships in-memory reference collaborators so the CLI and tests run without
//! external services.

pub mod engine;
pub mod fusion;
pub mod memory;
pub mod pipeline;

pub use engine::HybridEngine;
pub use fusion::fuse;
pub use pipeline::{DocumentPipeline, ProcessedFile};
