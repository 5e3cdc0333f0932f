//! vitarank-ranker — Keyterm scoring engine.
//! - Five independent unsupervised scoring algorithms
//! - Domain-relevance heuristic over a curated vocabulary
//! - Weighted fusion into one deterministic composite ranking
//! - Language analysis consumed behind the [`analyzer::LanguageAnalyzer`] seam

pub mod algorithms;
pub mod analyzer;
pub mod domain;
pub mod scorer;
pub mod weights;

pub use analyzer::{shared_analyzer, LanguageAnalyzer, NamedEntity, RuleBasedAnalyzer};
pub use domain::DomainVocabulary;
pub use scorer::{KeytermScorer, ScorerConfig};
pub use weights::FusionWeights;
