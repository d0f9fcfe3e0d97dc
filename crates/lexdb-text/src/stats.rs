//! Corpus statistics store: vocabulary, document frequencies and length
//! statistics over every chunk ever ingested.
//!
//! This is a plain injectable struct — the process-wide sharing model
//! (one instance behind `Arc<RwLock<_>>`) belongs to the engine that owns it,
//! and tests build isolated instances freely.
//!
//! State is append-only for the life of the process: vocabulary indices are
//! assigned in first-seen order and never reused or reassigned. Nothing is
//! persisted across restarts, so sparse vectors written to the index under a
//! previous process's term indices desynchronize from vectors encoded after a
//! restart. Callers that need stable indices must rebuild the index contents
//! together with the vocabulary.

use std::collections::{HashMap, HashSet};

use crate::normalize::normalize;

#[derive(Debug, Default)]
pub struct CorpusIndex {
    vocabulary: HashMap<String, u32>,
    document_frequency: HashMap<String, u32>,
    document_lengths: Vec<usize>,
    total_documents: u64,
    average_doc_length: f64,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one chunk: record its length, bump the document frequency of
    /// every distinct token by exactly one, and assign fresh vocabulary
    /// indices to unseen tokens strictly in first-seen order. Each call
    /// counts as one more document, even for repeated content.
    pub fn ingest(&mut self, text: &str) {
        let tokens = normalize(text);
        self.document_lengths.push(tokens.len());
        self.total_documents += 1;

        // Walk tokens in document order; the set only guards against
        // counting a token twice within this document.
        let mut seen: HashSet<&str> = HashSet::new();
        for token in &tokens {
            if !seen.insert(token.as_str()) {
                continue;
            }
            if !self.vocabulary.contains_key(token.as_str()) {
                let next = self.vocabulary.len() as u32;
                self.vocabulary.insert(token.clone(), next);
            }
            *self.document_frequency.entry(token.clone()).or_insert(0) += 1;
        }

        // Recomputed on every add; the invariant avg == sum(lengths)/total
        // holds after each ingestion.
        let total_len: usize = self.document_lengths.iter().sum();
        self.average_doc_length = total_len as f64 / self.total_documents as f64;
    }

    /// Clear everything and re-ingest the corpus from scratch, assigning
    /// fresh indices in iteration order. Invalidates every previously
    /// assigned index.
    pub fn rebuild<S: AsRef<str>>(&mut self, documents: &[S]) {
        self.vocabulary.clear();
        self.document_frequency.clear();
        self.document_lengths.clear();
        self.total_documents = 0;
        self.average_doc_length = 0.0;
        for doc in documents {
            self.ingest(doc.as_ref());
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn total_documents(&self) -> u64 {
        self.total_documents
    }

    /// Mean chunk length in tokens, 0.0 before the first ingestion.
    pub fn average_doc_length(&self) -> f64 {
        self.average_doc_length
    }

    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.vocabulary.get(token).copied()
    }

    pub fn document_frequency(&self, token: &str) -> u32 {
        self.document_frequency.get(token).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_tracks_lengths_and_average() {
        let mut index = CorpusIndex::new();
        index.ingest("decreto municipal orçamento");
        index.ingest("decreto estadual");

        assert_eq!(index.total_documents(), 2);
        // 3 tokens + 2 tokens, none of them stopwords.
        assert!((index.average_doc_length() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn distinct_tokens_count_once_per_document() {
        let mut index = CorpusIndex::new();
        index.ingest("decreto decreto decreto");
        let stem = normalize("decreto").remove(0);
        assert_eq!(index.document_frequency(&stem), 1);

        index.ingest("decreto municipal");
        assert_eq!(index.document_frequency(&stem), 2);
    }

    #[test]
    fn indices_follow_document_order_within_one_ingest() {
        let text = "decreto municipal orçamento licitação servidor \
                    efetivo processo seletivo publicação";
        let mut index = CorpusIndex::new();
        index.ingest(text);
        for (position, token) in normalize(text).iter().enumerate() {
            assert_eq!(index.index_of(token), Some(position as u32), "token {token}");
        }
    }

    #[test]
    fn rebuild_assigns_identical_indices_on_identical_input() {
        let docs = ["decreto municipal orçamento", "portaria nomeação decreto"];
        let mut index = CorpusIndex::new();
        index.rebuild(&docs);
        let before: Vec<_> =
            normalize(&docs.join(" ")).iter().map(|t| index.index_of(t)).collect();
        index.rebuild(&docs);
        let after: Vec<_> =
            normalize(&docs.join(" ")).iter().map(|t| index.index_of(t)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn vocabulary_indices_are_first_seen_and_stable() {
        let mut index = CorpusIndex::new();
        index.ingest("decreto municipal");
        let first = index.index_of(&normalize("decreto").remove(0));
        index.ingest("orçamento decreto");
        assert_eq!(index.index_of(&normalize("decreto").remove(0)), first);
        assert_eq!(index.vocabulary_size(), 3);
    }

    #[test]
    fn rebuild_is_idempotent_on_identical_input() {
        let docs = ["decreto municipal orçamento", "portaria de nomeação"];
        let mut index = CorpusIndex::new();
        index.rebuild(&docs);
        let size_first = index.vocabulary_size();
        index.rebuild(&docs);
        assert_eq!(index.vocabulary_size(), size_first);
        assert_eq!(index.total_documents(), 2);
    }
}
