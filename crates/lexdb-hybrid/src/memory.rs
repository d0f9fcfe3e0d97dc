//! In-memory reference collaborators.
//!
//! These let the CLI and the integration tests exercise the full ingestion
//! and query paths with zero external services. They are deliberately small:
//! the production embedding provider and vector index live behind the same
//! traits, outside this crate.

use std::collections::HashMap;
use std::hash::Hasher;
use std::sync::RwLock;

use anyhow::{bail, Result};

use lexdb_core::traits::{Embedder, ObjectStore, TextExtractor, VectorIndex};
use lexdb_core::types::{ExtractedDocument, Filter, RankedResult, SparseVector, VectorPoint};

/// Deterministic token-hash embedder. Texts sharing words land near each
/// other; good enough for tests and interactive experimentation, useless for
/// real semantics.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dim];
        for (position, token) in text.split_whitespace().enumerate() {
            let mut hasher = twox_hash::XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let hash = hasher.finish();
            let slot = (hash as usize) % self.dim;
            let value = ((hash >> 32) as u32) as f32 / u32::MAX as f32;
            vector[slot] += value + (position % 3) as f32 * 0.01;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut vector {
            *x /= norm;
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_sync(text)).collect())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let lookup: HashMap<u32, f32> = a.indices.iter().copied().zip(a.values.iter().copied()).collect();
    b.indices
        .iter()
        .zip(&b.values)
        .filter_map(|(index, value)| lookup.get(index).map(|av| av * value))
        .sum()
}

fn matches_filter(payload: &serde_json::Value, filter: Option<&Filter>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let metadata = &payload["metadata"];
    filter.iter().all(|(key, expected)| {
        let direct = metadata.get(key).and_then(|v| v.as_str()) == Some(expected);
        let extra = metadata["extra"].get(key).and_then(|v| v.as_str()) == Some(expected);
        direct || extra
    })
}

/// Brute-force vector index keyed by point id.
#[derive(Default)]
pub struct MemoryVectorIndex {
    points: RwLock<HashMap<String, VectorPoint>>,
}

impl MemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn search_by<F>(&self, score: F, filter: Option<&Filter>, k: usize) -> Vec<RankedResult>
    where
        F: Fn(&VectorPoint) -> f32,
    {
        let points = self.points.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut hits: Vec<RankedResult> = points
            .values()
            .filter(|point| matches_filter(&point.payload, filter))
            .map(|point| RankedResult {
                id: point.id.clone(),
                payload: point.payload.clone(),
                score: score(point),
            })
            .filter(|hit| hit.score > 0.0)
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        hits
    }
}

impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()> {
        let mut map = self.points.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        for point in points {
            map.insert(point.id.clone(), point);
        }
        Ok(())
    }

    async fn search_dense(
        &self,
        vector: &[f32],
        filter: Option<&Filter>,
        k: usize,
    ) -> Result<Vec<RankedResult>> {
        Ok(self.search_by(|point| cosine(&point.dense, vector), filter, k))
    }

    async fn search_sparse(
        &self,
        vector: &SparseVector,
        filter: Option<&Filter>,
        k: usize,
    ) -> Result<Vec<RankedResult>> {
        Ok(self.search_by(|point| sparse_dot(&point.sparse, vector), filter, k))
    }
}

/// Object store backed by a map; handles are `mem://` pseudo-URLs.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bytes: &[u8], filename: &str, _mime_type: &str) -> Result<String> {
        let mut hasher = twox_hash::XxHash64::with_seed(0);
        hasher.write(bytes);
        let handle = format!("mem://{:016x}/{filename}", hasher.finish());
        self.objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(handle.clone(), bytes.to_vec());
        Ok(handle)
    }

    async fn url(&self, handle: &str) -> Result<String> {
        let objects = self.objects.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !objects.contains_key(handle) {
            bail!("unknown object handle: {handle}");
        }
        Ok(handle.to_string())
    }
}

/// Extractor for plain text and markdown only, mirroring what the ingestion
/// surface accepts.
#[derive(Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<ExtractedDocument> {
        if mime_type != "text/plain" && mime_type != "text/markdown" {
            bail!("unsupported mime type: {mime_type} (only text files are supported)");
        }
        let text = String::from_utf8_lossy(bytes).into_owned();
        let mut metadata = HashMap::new();
        metadata.insert("filename".to_string(), filename.to_string());
        metadata.insert("mime_type".to_string(), mime_type.to_string());
        metadata.insert("char_count".to_string(), text.chars().count().to_string());
        Ok(ExtractedDocument { text, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_embedder_is_deterministic_and_normalized() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed_sync("decreto municipal");
        let b = embedder.embed_sync("decreto municipal");
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }

    #[test]
    fn sparse_dot_only_counts_shared_indices() {
        let a = SparseVector { indices: vec![1, 3, 5], values: vec![1.0, 2.0, 3.0] };
        let b = SparseVector { indices: vec![3, 9], values: vec![4.0, 100.0] };
        assert!((sparse_dot(&a, &b) - 8.0).abs() < 1e-6);
    }

    #[test]
    fn filter_matches_direct_and_extra_metadata() {
        let payload = serde_json::json!({
            "text": "x",
            "metadata": { "source": "a.txt", "extra": { "folder": "/rh" } }
        });
        let mut filter = Filter::new();
        filter.insert("source".to_string(), "a.txt".to_string());
        assert!(matches_filter(&payload, Some(&filter)));

        filter.insert("folder".to_string(), "/rh".to_string());
        assert!(matches_filter(&payload, Some(&filter)));

        filter.insert("folder".to_string(), "/obras".to_string());
        assert!(!matches_filter(&payload, Some(&filter)));
    }
}
