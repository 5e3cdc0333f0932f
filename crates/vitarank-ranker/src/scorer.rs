//! Composite keyterm scoring.
//!
//! Runs every registered algorithm over identically pre-analyzed text,
//! unions their candidates, attaches domain relevance, and fuses the
//! signals with the configured weight vector into one deterministic
//! ranking.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vitarank_common::document::KeytermCandidate;
use vitarank_common::text::preprocess_for_scoring;

use crate::algorithms::{default_algorithms, AnalyzedText, KeytermAlgorithm};
use crate::analyzer::{shared_analyzer, LanguageAnalyzer};
use crate::domain::DomainVocabulary;
use crate::weights::FusionWeights;

/// Scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Result cap.
    pub top_n: usize,
    pub weights: FusionWeights,
    /// Extra vocabulary entries merged into the built-in domain sets.
    pub extra_domain_terms: Vec<String>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            weights: FusionWeights::default(),
            extra_domain_terms: Vec::new(),
        }
    }
}

impl ScorerConfig {
    /// Parse a config from TOML, filling unset fields with defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Produces a deterministic, bounded-length ranked list of representative
/// terms from text.
pub struct KeytermScorer {
    config: ScorerConfig,
    algorithms: Vec<Box<dyn KeytermAlgorithm>>,
    vocabulary: DomainVocabulary,
    analyzer: Arc<dyn LanguageAnalyzer>,
}

impl Default for KeytermScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

impl KeytermScorer {
    pub fn new(config: ScorerConfig) -> Self {
        let vocabulary = DomainVocabulary::with_extra_terms(&config.extra_domain_terms);
        Self {
            config,
            algorithms: default_algorithms(),
            vocabulary,
            analyzer: shared_analyzer(),
        }
    }

    /// Swap in a different language capability (e.g. a fixture).
    pub fn with_analyzer(mut self, analyzer: Arc<dyn LanguageAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the registered algorithm set.
    pub fn with_algorithms(mut self, algorithms: Vec<Box<dyn KeytermAlgorithm>>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Rank the representative terms of `text`.
    ///
    /// Deterministic: identical text and configuration produce identical
    /// output, independent of algorithm execution order. A failing
    /// algorithm degrades to an empty contribution rather than aborting.
    pub fn score(&self, text: &str) -> Vec<KeytermCandidate> {
        let prepared = preprocess_for_scoring(text);
        if prepared.is_empty() {
            return Vec::new();
        }

        let entities: BTreeSet<String> = self
            .analyzer
            .named_entities(text)
            .into_iter()
            .map(|e| e.text.to_lowercase())
            .collect();
        let lemmas: Vec<String> = self
            .analyzer
            .tokenize(&prepared)
            .iter()
            .map(|t| self.analyzer.lemmatize(t))
            .collect();
        let doc = AnalyzedText { lemmas, entities };

        let mut signals: Vec<(&'static str, BTreeMap<String, f64>)> = Vec::new();
        for algorithm in &self.algorithms {
            let scores = match algorithm.score(&doc) {
                Ok(scores) => scores,
                Err(e) => {
                    warn!(algorithm = algorithm.name(), error = %e, "scoring algorithm failed");
                    BTreeMap::new()
                }
            };
            debug!(algorithm = algorithm.name(), terms = scores.len(), "signal computed");
            signals.push((algorithm.name(), scores));
        }

        let candidate_terms: BTreeSet<&String> =
            signals.iter().flat_map(|(_, scores)| scores.keys()).collect();

        let mut candidates: Vec<KeytermCandidate> = candidate_terms
            .into_iter()
            .map(|term| {
                let per_algorithm_scores: BTreeMap<String, f64> = signals
                    .iter()
                    .map(|(name, scores)| {
                        (name.to_string(), scores.get(term).copied().unwrap_or(0.0))
                    })
                    .collect();
                let domain_relevance = self.vocabulary.relevance(term);
                let composite_score =
                    composite(&self.config.weights, &per_algorithm_scores, domain_relevance);
                KeytermCandidate {
                    term: term.clone(),
                    per_algorithm_scores,
                    domain_relevance,
                    composite_score,
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });
        candidates.truncate(self.config.top_n);
        candidates
    }
}

/// Weighted fusion of one candidate's signals:
/// `Σ weight_i × score_i` over all algorithms plus domain relevance.
fn composite(
    weights: &FusionWeights,
    per_algorithm_scores: &BTreeMap<String, f64>,
    domain_relevance: f64,
) -> f64 {
    let algorithms: f64 = per_algorithm_scores
        .iter()
        .map(|(name, score)| weights.for_algorithm(name) * score)
        .sum();
    algorithms + weights.domain_relevance * domain_relevance
}
