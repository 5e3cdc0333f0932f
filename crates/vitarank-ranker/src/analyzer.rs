//! The language-analysis seam.
//!
//! Scoring algorithms consume linguistic analysis through
//! [`LanguageAnalyzer`], so the fusion logic stays testable against fixed
//! fixture outputs and any heavier model can be dropped in behind the same
//! contract. The built-in [`RuleBasedAnalyzer`] is deterministic and
//! dependency-free.

use std::sync::{Arc, OnceLock};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

/// A named-entity span recognized in raw (pre-normalization) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    pub text: String,
    pub label: String,
}

/// Contract required from the pretrained language capability.
pub trait LanguageAnalyzer: Send + Sync {
    /// Split text into surface tokens, preserving order.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Reduce one token to its dictionary form.
    fn lemmatize(&self, token: &str) -> String;

    /// Recognize named-entity spans in raw text.
    fn named_entities(&self, text: &str) -> Vec<NamedEntity>;
}

lazy_static! {
    // Two or more capitalized words in a row ("Amazon Web Services"),
    // or an all-caps token of length >= 2 ("AWS", "SQL").
    static ref CAP_RUN: Regex =
        Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)+\b").unwrap();
    static ref ACRONYM: Regex = Regex::new(r"\b[A-Z]{2,}\b").unwrap();
}

/// Deterministic rule-based analyzer: whitespace tokenization, a
/// suffix-stripping lemmatizer, and a capitalization heuristic for
/// entities. Suitable as a test fixture and as the default runtime
/// implementation.
#[derive(Debug, Default)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageAnalyzer for RuleBasedAnalyzer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn lemmatize(&self, token: &str) -> String {
        let t = token;
        if let Some(stem) = t.strip_suffix("ies") {
            if stem.len() >= 2 {
                return format!("{stem}y");
            }
        }
        if let Some(stem) = t.strip_suffix("sses") {
            return format!("{stem}ss");
        }
        if t.len() > 3 && t.ends_with('s') && !t.ends_with("ss") && !t.ends_with("us") && !t.ends_with("is") {
            return t[..t.len() - 1].to_string();
        }
        t.to_string()
    }

    fn named_entities(&self, text: &str) -> Vec<NamedEntity> {
        let mut entities = Vec::new();
        for m in CAP_RUN.find_iter(text) {
            entities.push(NamedEntity { text: m.as_str().to_string(), label: "span".to_string() });
        }
        for m in ACRONYM.find_iter(text) {
            entities.push(NamedEntity { text: m.as_str().to_string(), label: "acronym".to_string() });
        }
        entities
    }
}

static SHARED: OnceLock<Arc<dyn LanguageAnalyzer>> = OnceLock::new();

/// Process-wide analyzer handle. Initialized on first call through this
/// factory and never reloaded; there is no import-time side effect.
pub fn shared_analyzer() -> Arc<dyn LanguageAnalyzer> {
    SHARED
        .get_or_init(|| {
            info!("initializing shared language analyzer");
            Arc::new(RuleBasedAnalyzer::new())
        })
        .clone()
}
