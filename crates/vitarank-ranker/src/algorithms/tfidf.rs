//! Sublinear term frequency over 1..=3-grams, L2-normalized.
//!
//! With a single document there is no corpus to supply inverse document
//! frequencies, so the signal reduces to normalized sublinear tf, the
//! degenerate single-document case of the classic vectorizer.

use std::collections::BTreeMap;

use super::{max_normalize, ngram_positions, AnalyzedText, KeytermAlgorithm};

#[derive(Debug, Clone)]
pub struct TfIdf {
    /// Longest n-gram considered.
    pub max_ngram: usize,
}

impl Default for TfIdf {
    fn default() -> Self {
        Self { max_ngram: 3 }
    }
}

impl KeytermAlgorithm for TfIdf {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn score(&self, doc: &AnalyzedText) -> anyhow::Result<BTreeMap<String, f64>> {
        if doc.lemmas.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut scores: BTreeMap<String, f64> = ngram_positions(&doc.lemmas, self.max_ngram)
            .into_iter()
            .map(|(term, positions)| (term, 1.0 + (positions.len() as f64).ln()))
            .collect();

        let norm = scores.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in scores.values_mut() {
                *value /= norm;
            }
        }

        Ok(max_normalize(scores))
    }
}
