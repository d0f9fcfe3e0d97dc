//! BM25 sparse encoding against a [`CorpusIndex`].
//!
//! The same code path serves corpus chunks and queries: a query is scored as
//! a one-off term-frequency table, it is never ingested into the store.

use std::collections::HashMap;

use lexdb_core::types::SparseVector;

use crate::normalize::normalize;
use crate::stats::CorpusIndex;

const K1: f64 = 1.2;
const B: f64 = 0.75;

fn bm25_score(tf: f64, df: f64, doc_len: f64, total_docs: f64, avg_len: f64) -> f64 {
    let idf = ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln();
    let numerator = tf * (K1 + 1.0);
    let denominator = tf + K1 * (1.0 - B + B * (doc_len / avg_len));
    idf * (numerator / denominator)
}

/// Encode text as a BM25-weighted sparse vector.
///
/// Terms absent from the corpus vocabulary are silently skipped, and terms
/// whose score comes out non-positive are omitted. With an empty corpus the
/// average length is taken as 1.0 so nothing divides by zero; with an empty
/// vocabulary the result is simply empty.
pub fn encode(index: &CorpusIndex, text: &str) -> SparseVector {
    if index.vocabulary_size() == 0 {
        return SparseVector::default();
    }

    let tokens = normalize(text);
    let doc_len = tokens.len() as f64;

    let mut term_frequency: HashMap<String, u64> = HashMap::new();
    for token in tokens {
        *term_frequency.entry(token).or_insert(0) += 1;
    }

    let total_docs = index.total_documents() as f64;
    let avg_len = if index.average_doc_length() > 0.0 {
        index.average_doc_length()
    } else {
        1.0
    };

    let mut indices = Vec::new();
    let mut values = Vec::new();
    for (term, tf) in term_frequency {
        let Some(vocab_index) = index.index_of(&term) else {
            continue;
        };
        let df = f64::from(index.document_frequency(&term));
        let score = bm25_score(tf as f64, df, doc_len, total_docs, avg_len);
        if score > 0.0 {
            indices.push(vocab_index);
            values.push(score as f32);
        }
    }

    SparseVector { indices, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_vocabulary_encodes_to_empty_vector() {
        let index = CorpusIndex::new();
        assert!(encode(&index, "decreto municipal").is_empty());
    }

    #[test]
    fn unknown_terms_are_silently_skipped() {
        let mut index = CorpusIndex::new();
        index.ingest("decreto municipal");
        let vector = encode(&index, "decreto xyzzyplugh");
        assert_eq!(vector.len(), 1);
    }

    #[test]
    fn indices_are_distinct_and_values_positive() {
        let mut index = CorpusIndex::new();
        index.rebuild(&["decreto municipal orçamento", "portaria decreto nomeação"]);
        let vector = encode(&index, "decreto orçamento decreto portaria");

        let mut seen = std::collections::HashSet::new();
        for &i in &vector.indices {
            assert!(seen.insert(i), "duplicate index {i}");
        }
        assert!(vector.values.iter().all(|&v| v > 0.0));
        assert_eq!(vector.indices.len(), vector.values.len());
    }

    #[test]
    fn score_is_monotonic_in_term_frequency() {
        // N=10, df=2, avgL=100: tf=1 must score no higher than tf=3.
        let low = bm25_score(1.0, 2.0, 100.0, 10.0, 100.0);
        let high = bm25_score(3.0, 2.0, 100.0, 10.0, 100.0);
        assert!(low <= high);
        assert!(low > 0.0);
    }
}
