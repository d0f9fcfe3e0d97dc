//! End-to-end document ingestion: extract, store the original, chunk with
//! both strategies, index.

use std::collections::HashMap;

use tracing::info;

use lexdb_core::config::ChunkingConfig;
use lexdb_core::traits::{Embedder, ObjectStore, TextExtractor, VectorIndex};
use lexdb_core::{Error, Result};
use lexdb_chunk::{chunk_smart, chunk_text, dedupe_chunks};

use crate::engine::HybridEngine;

/// Summary returned to the caller after a file is processed.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub filename: String,
    pub mime_type: String,
    /// Object-store handle for the original bytes.
    pub handle: String,
    /// Number of chunks indexed after pooling and deduplication.
    pub chunks: usize,
    /// First 200 characters of the extracted text.
    pub preview: String,
    pub metadata: HashMap<String, String>,
}

pub struct DocumentPipeline<X, S, E, V> {
    extractor: X,
    store: S,
    engine: HybridEngine<E, V>,
    chunking: ChunkingConfig,
}

impl<X, S, E, V> DocumentPipeline<X, S, E, V>
where
    X: TextExtractor,
    S: ObjectStore,
    E: Embedder,
    V: VectorIndex,
{
    pub fn new(
        extractor: X,
        store: S,
        engine: HybridEngine<E, V>,
        chunking: ChunkingConfig,
    ) -> Result<Self> {
        chunking.validate()?;
        Ok(Self { extractor, store, engine, chunking })
    }

    pub fn engine(&self) -> &HybridEngine<E, V> {
        &self.engine
    }

    /// Process one file: extract text, persist the original bytes, chunk with
    /// both strategies (pooled and deduplicated), and index everything.
    ///
    /// Caller-supplied `extra` metadata rides on every chunk for later
    /// filtering.
    pub async fn process_file(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
        extra: Option<HashMap<String, String>>,
    ) -> Result<ProcessedFile> {
        let document = self
            .extractor
            .extract(bytes, filename, mime_type)
            .await
            .map_err(|e| Error::dependency("extraction subsystem", e))?;

        let handle = self
            .store
            .put(bytes, filename, mime_type)
            .await
            .map_err(|e| Error::dependency("object store", e))?;

        let mut pooled = chunk_text(&document.text, self.chunking.chunk_size, self.chunking.chunk_overlap)?;
        pooled.extend(chunk_smart(
            &document.text,
            self.chunking.chunk_size,
            self.chunking.chunk_overlap,
        )?);
        let mut chunks = dedupe_chunks(pooled);

        for chunk in &mut chunks {
            chunk.metadata.source = Some(filename.to_string());
            for (key, value) in &document.metadata {
                chunk.metadata.extra.insert(key.clone(), value.clone());
            }
            if let Some(extra) = &extra {
                for (key, value) in extra {
                    chunk.metadata.extra.insert(key.clone(), value.clone());
                }
            }
        }

        let indexed = self.engine.index_chunks(&chunks).await?;
        info!(filename, chunks = indexed, "processed file");

        let preview: String = document.text.chars().take(200).collect();
        let mut metadata = document.metadata;
        if let Some(extra) = extra {
            metadata.extend(extra);
        }

        Ok(ProcessedFile {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            handle,
            chunks: indexed,
            preview,
            metadata,
        })
    }
}
