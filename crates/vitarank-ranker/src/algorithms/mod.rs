//! Unsupervised keyterm scoring algorithms.
//!
//! Each algorithm maps analyzed text to `term -> score` independently;
//! algorithms may disagree on term granularity ("data" vs "data science").
//! Scores are max-normalized to [0, 1] per algorithm so the fusion weight
//! vector acts on commensurate signals.

pub mod scake;
pub mod sgrank;
pub mod textrank;
pub mod tfidf;
pub mod yake;

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;

pub use scake::Scake;
pub use sgrank::SgRank;
pub use textrank::TextRank;
pub use tfidf::TfIdf;
pub use yake::Yake;

/// Pre-analyzed input shared by every algorithm run of one `score()` call.
/// Building it once keeps the algorithms free of shared mutable state and
/// guarantees they all see identical input.
#[derive(Debug, Clone)]
pub struct AnalyzedText {
    /// Lemmatized tokens of the preprocessed text, in document order.
    pub lemmas: Vec<String>,
    /// Lowercased named-entity surface forms from the raw text.
    pub entities: BTreeSet<String>,
}

/// One independent scoring signal.
pub trait KeytermAlgorithm: Send + Sync {
    /// Stable signal name; used as the key in per-algorithm score maps.
    fn name(&self) -> &'static str;

    /// Score terms found in `doc`. An error is absorbed by the scorer as
    /// an empty contribution.
    fn score(&self, doc: &AnalyzedText) -> anyhow::Result<BTreeMap<String, f64>>;
}

/// The registered algorithm set, in fusion-weight order.
pub fn default_algorithms() -> Vec<Box<dyn KeytermAlgorithm>> {
    vec![
        Box::new(TextRank::default()),
        Box::new(SgRank::default()),
        Box::new(Scake::default()),
        Box::new(Yake::default()),
        Box::new(TfIdf::default()),
    ]
}

lazy_static! {
    /// Function words excluded from candidate terms and phrase edges.
    static ref STOPWORDS: BTreeSet<&'static str> = BTreeSet::from([
        "a", "about", "above", "after", "again", "all", "also", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being",
        "below", "between", "both", "but", "by", "can", "could", "did", "do",
        "does", "doing", "down", "during", "each", "few", "for", "from",
        "further", "had", "has", "have", "having", "he", "her", "here",
        "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "just", "me", "more", "most", "my", "no", "nor", "not", "now",
        "of", "off", "on", "once", "only", "or", "other", "our", "out",
        "over", "own", "same", "she", "should", "so", "some", "such", "than",
        "that", "the", "their", "them", "then", "there", "these", "they",
        "this", "those", "through", "to", "too", "under", "until", "up",
        "very", "was", "we", "were", "what", "when", "where", "which",
        "while", "who", "whom", "why", "will", "with", "would", "you",
        "your",
    ]);
}

/// True for tokens worth scoring: not a stopword, at least two characters,
/// and containing a letter.
pub(crate) fn is_candidate_token(token: &str) -> bool {
    token.len() >= 2
        && !STOPWORDS.contains(token)
        && token.chars().any(|c| c.is_alphabetic())
}

/// Positions (by first token) of every 1..=max_n gram whose edge tokens
/// are candidates. Interior stopwords are allowed inside longer grams.
pub(crate) fn ngram_positions(
    lemmas: &[String],
    max_n: usize,
) -> BTreeMap<String, Vec<usize>> {
    let mut positions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for n in 1..=max_n {
        for (start, window) in lemmas.windows(n).enumerate() {
            let first = window.first().map(String::as_str).unwrap_or_default();
            let last = window.last().map(String::as_str).unwrap_or_default();
            if !is_candidate_token(first) || !is_candidate_token(last) {
                continue;
            }
            positions.entry(window.join(" ")).or_default().push(start);
        }
    }
    positions
}

/// Scale a score map so its maximum is 1.0. Empty and all-zero maps pass
/// through unchanged.
pub(crate) fn max_normalize(mut scores: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let max = scores.values().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for value in scores.values_mut() {
            *value /= max;
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmas(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_candidate_token_filter() {
        assert!(is_candidate_token("python"));
        assert!(!is_candidate_token("the"));
        assert!(!is_candidate_token("x"));
        assert!(!is_candidate_token("2024"));
        assert!(is_candidate_token("node.js"));
    }

    #[test]
    fn test_ngram_positions_edges_must_be_candidates() {
        let grams = ngram_positions(&lemmas("head of engineering"), 3);
        assert!(grams.contains_key("head"));
        assert!(grams.contains_key("engineering"));
        assert!(grams.contains_key("head of engineering"));
        // "of engineering" starts with a stopword
        assert!(!grams.contains_key("of engineering"));
        assert!(!grams.contains_key("of"));
    }

    #[test]
    fn test_ngram_positions_records_repeats() {
        let grams = ngram_positions(&lemmas("rust services rust services"), 2);
        assert_eq!(grams["rust"], vec![0, 2]);
        assert_eq!(grams["rust services"], vec![0, 2]);
    }

    #[test]
    fn test_max_normalize() {
        let scores = BTreeMap::from([("a".to_string(), 2.0), ("b".to_string(), 1.0)]);
        let normed = max_normalize(scores);
        assert_eq!(normed["a"], 1.0);
        assert_eq!(normed["b"], 0.5);
    }
}
