//! The hybrid engine: one corpus statistics store shared across concurrent
//! ingestions and queries, plus the embedding/upsert/search orchestration.

use std::hash::Hasher;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::try_join_all;
use serde_json::json;
use tracing::{debug, info};

use lexdb_core::config::HybridConfig;
use lexdb_core::traits::{Embedder, VectorIndex};
use lexdb_core::types::{Filter, RankedResult, SparseVector, TextChunk, VectorPoint};
use lexdb_core::{Error, Result};
use lexdb_text::{encode, CorpusIndex};

use crate::fusion::fuse;

/// Deterministic point id: re-indexing identical content upserts in place
/// instead of accumulating duplicates.
fn point_id(chunk: &TextChunk) -> String {
    let mut hasher = twox_hash::XxHash64::with_seed(0);
    hasher.write(chunk.text.as_bytes());
    format!("{:016x}", hasher.finish() ^ chunk.chunk_index as u64)
}

pub struct HybridEngine<E, V> {
    corpus: Arc<RwLock<CorpusIndex>>,
    embedder: E,
    index: V,
    config: HybridConfig,
}

impl<E, V> HybridEngine<E, V>
where
    E: Embedder,
    V: VectorIndex,
{
    pub fn new(embedder: E, index: V, config: HybridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { corpus: Arc::new(RwLock::new(CorpusIndex::new())), embedder, index, config })
    }

    /// Build an engine over an existing (possibly pre-populated) store.
    pub fn with_corpus(
        corpus: Arc<RwLock<CorpusIndex>>,
        embedder: E,
        index: V,
        config: HybridConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { corpus, embedder, index, config })
    }

    fn corpus_read(&self) -> RwLockReadGuard<'_, CorpusIndex> {
        self.corpus.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn corpus_write(&self) -> RwLockWriteGuard<'_, CorpusIndex> {
        self.corpus.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Feed one chunk into the corpus statistics store.
    pub fn ingest_for_scoring(&self, text: &str) {
        self.corpus_write().ingest(text);
    }

    /// BM25-encode text against the current corpus statistics. Queries go
    /// through this same path and are never ingested.
    pub fn encode_sparse(&self, text: &str) -> SparseVector {
        encode(&self.corpus_read(), text)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.corpus_read().vocabulary_size()
    }

    pub fn total_documents(&self) -> u64 {
        self.corpus_read().total_documents()
    }

    /// Ingest chunks into the corpus statistics, embed them in fixed-size
    /// concurrent batches, and submit the combined point set to the vector
    /// index in one call. Batch order and intra-batch order are preserved, so
    /// each chunk keeps its positional embedding.
    ///
    /// If the embedding provider or the index call fails, the statistics
    /// mutated up front stay mutated — there is no rollback, and the store
    /// then references content the index never received. Callers needing
    /// strict consistency must treat ingestion as their own retry unit.
    pub async fn index_chunks(&self, chunks: &[TextChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        {
            let mut corpus = self.corpus_write();
            for chunk in chunks {
                corpus.ingest(&chunk.text);
            }
        }

        let sparse_vectors: Vec<SparseVector> = {
            let corpus = self.corpus_read();
            chunks.iter().map(|chunk| encode(&corpus, &chunk.text)).collect()
        };

        let batches: Vec<Vec<String>> = chunks
            .chunks(self.config.embed_batch_size)
            .map(|batch| batch.iter().map(|chunk| chunk.text.clone()).collect())
            .collect();
        debug!(chunks = chunks.len(), batches = batches.len(), "embedding chunk batches");

        let embedded = try_join_all(batches.iter().map(|batch| self.embedder.embed_batch(batch)))
            .await
            .map_err(|e| Error::dependency("embedding provider", e))?;
        let dense_vectors: Vec<Vec<f32>> = embedded.into_iter().flatten().collect();

        let points: Vec<VectorPoint> = chunks
            .iter()
            .zip(dense_vectors)
            .zip(sparse_vectors)
            .map(|((chunk, dense), sparse)| VectorPoint {
                id: point_id(chunk),
                dense,
                sparse,
                payload: json!({
                    "text": chunk.text,
                    "metadata": serde_json::to_value(&chunk.metadata)
                        .unwrap_or(serde_json::Value::Null),
                }),
            })
            .collect();

        let count = points.len();
        self.index
            .upsert(points)
            .await
            .map_err(|e| Error::dependency("vector index", e))?;
        info!(chunks = count, vocabulary = self.vocabulary_size(), "indexed chunks");
        Ok(count)
    }

    /// Hybrid query: the dense embedding call and the sparse-vector
    /// construction both complete before fusion, both retrieval modes
    /// over-fetch `2*limit`, and the fused top `limit` is returned.
    pub async fn query(
        &self,
        text: &str,
        filter: Option<&Filter>,
        alpha: f32,
        limit: usize,
    ) -> Result<Vec<RankedResult>> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::InvalidConfig(format!("alpha ({alpha}) must be within [0, 1]")));
        }

        // The sparse side is pure computation and never suspends; building it
        // first then awaiting the embedder is the fan-out.
        let sparse_query = self.encode_sparse(text);
        let dense_query = self
            .embedder
            .embed(text)
            .await
            .map_err(|e| Error::dependency("embedding provider", e))?;

        let fetch = limit.saturating_mul(2);
        let (dense_hits, sparse_hits) = futures::try_join!(
            self.index.search_dense(&dense_query, filter, fetch),
            self.index.search_sparse(&sparse_query, filter, fetch),
        )
        .map_err(|e| Error::dependency("vector index", e))?;
        debug!(dense = dense_hits.len(), sparse = sparse_hits.len(), alpha, "fusing candidates");

        Ok(fuse(&dense_hits, &sparse_hits, alpha, limit))
    }
}
