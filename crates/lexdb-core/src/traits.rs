//! Collaborator seams. Everything that may block or suspend lives behind one
//! of these traits; the chunkers and encoders are purely computational.
//!
//! Implementations are consumed through generic parameters, so `async fn`
//! works without boxing. All seams speak `anyhow::Result`; the engine maps
//! failures into [`crate::Error::Dependency`] with the service name.

#![allow(async_fn_in_trait)]

use anyhow::Result;

use crate::types::{ExtractedDocument, Filter, RankedResult, SparseVector, VectorPoint};

/// Extraction subsystem: raw bytes in, text plus metadata out.
pub trait TextExtractor: Send + Sync {
    async fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<ExtractedDocument>;
}

/// Dense embedding provider.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    /// Batched variant. Output order must match input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Vector index service: persists points and executes nearest-neighbor /
/// sparse-similarity search. This core never runs similarity search itself.
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()>;
    async fn search_dense(
        &self,
        vector: &[f32],
        filter: Option<&Filter>,
        k: usize,
    ) -> Result<Vec<RankedResult>>;
    async fn search_sparse(
        &self,
        vector: &SparseVector,
        filter: Option<&Filter>,
        k: usize,
    ) -> Result<Vec<RankedResult>>;
}

/// Durable storage for original files.
pub trait ObjectStore: Send + Sync {
    /// Stores the bytes and returns an opaque handle.
    async fn put(&self, bytes: &[u8], filename: &str, mime_type: &str) -> Result<String>;
    /// Resolves a handle to a caller-presentable URL.
    async fn url(&self, handle: &str) -> Result<String>;
}
