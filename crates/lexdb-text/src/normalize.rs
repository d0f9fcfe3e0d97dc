//! Token normalization: case-folding, word tokenization, stopword removal
//! and Portuguese Snowball stemming.
//!
//! The corpus is Portuguese-language administrative text, so the Portuguese
//! stemmer is authoritative; the stopword set covers Portuguese plus the
//! English that leaks into headers and attachments.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::sync::LazyLock;

const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "até", "com",
    "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do", "dos", "e",
    "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "essa", "essas", "esse",
    "esses", "esta", "estas", "este", "estes", "estou", "está", "estão", "eu", "foi", "foram",
    "há", "isso", "isto", "já", "lhe", "lhes", "mais", "mas", "me", "mesmo", "meu", "meus",
    "minha", "minhas", "muito", "na", "nas", "nem", "no", "nos", "nossa", "nossas", "nosso",
    "nossos", "num", "numa", "não", "nós", "o", "os", "ou", "para", "pela", "pelas", "pelo",
    "pelos", "por", "qual", "quando", "que", "quem", "se", "sem", "ser", "seu", "seus", "sua",
    "suas", "são", "só", "também", "te", "tem", "tenho", "teu", "tua", "têm", "um", "uma",
    "você", "vocês", "à", "às", "é",
];

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "had",
    "has", "have", "he", "her", "his", "if", "in", "into", "is", "it", "its", "no", "not",
    "of", "on", "or", "she", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "to", "was", "were", "which", "will", "with",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    PORTUGUESE_STOPWORDS
        .iter()
        .chain(ENGLISH_STOPWORDS.iter())
        .copied()
        .collect()
});

/// Normalize text into an ordered token sequence.
///
/// Lowercases, splits on anything non-alphanumeric (alphanumeric runs are the
/// tokens), drops stopwords, stems the survivors. Deterministic and
/// side-effect free; empty input yields an empty sequence, never an error.
pub fn normalize(text: &str) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::Portuguese);
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !STOPWORDS.contains(token))
        .map(|token| stemmer.stem(token).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n\t").is_empty());
        assert!(normalize("... !!! ???").is_empty());
    }

    #[test]
    fn stopwords_in_both_languages_are_removed() {
        assert!(normalize("de para com não").is_empty());
        assert!(normalize("the of and with").is_empty());
    }

    #[test]
    fn punctuation_separates_tokens() {
        let tokens = normalize("servidor,efetivo;lotado");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn plural_and_singular_stem_together() {
        assert_eq!(normalize("decretos"), normalize("decreto"));
        assert_eq!(normalize("processos"), normalize("processo"));
    }

    #[test]
    fn case_folding_applies_before_everything() {
        assert_eq!(normalize("PORTARIA"), normalize("portaria"));
    }
}
