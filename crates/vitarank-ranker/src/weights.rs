//! Fusion weight vector over the scoring signals.

use serde::{Deserialize, Serialize};

/// One weight per registered algorithm plus the domain-relevance signal.
/// Weights sum to 1.0. The defaults are a fixed prior, not learned values;
/// treat them as tunable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub textrank: f64,
    pub sgrank: f64,
    pub scake: f64,
    pub yake: f64,
    pub tfidf: f64,
    pub domain_relevance: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            textrank:         0.20,
            sgrank:           0.20,
            scake:            0.15,
            yake:             0.15,
            tfidf:            0.15,
            domain_relevance: 0.15,
        }
    }
}

impl FusionWeights {
    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }

    /// Renormalise weights so they sum to 1.0
    pub fn normalise(&mut self) {
        let sum = self.sum();
        if sum > 0.0 {
            self.textrank         /= sum;
            self.sgrank           /= sum;
            self.scake            /= sum;
            self.yake             /= sum;
            self.tfidf            /= sum;
            self.domain_relevance /= sum;
        }
    }

    fn sum(&self) -> f64 {
        self.textrank + self.sgrank + self.scake + self.yake + self.tfidf + self.domain_relevance
    }

    /// Weight for one algorithm's signal by name. Unknown signals carry
    /// zero weight, so an unregistered algorithm cannot shift a composite.
    pub fn for_algorithm(&self, name: &str) -> f64 {
        match name {
            "textrank" => self.textrank,
            "sgrank"   => self.sgrank,
            "scake"    => self.scake,
            "yake"     => self.yake,
            "tfidf"    => self.tfidf,
            _          => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = FusionWeights::default();
        assert!(w.validate(), "Default weights must sum to 1.0");
    }

    #[test]
    fn test_normalise_restores_sum() {
        let mut w = FusionWeights::default();
        w.textrank += 0.10; // deliberately break sum
        assert!(!w.validate());
        w.normalise();
        assert!(w.validate());
    }

    #[test]
    fn test_unknown_algorithm_has_zero_weight() {
        let w = FusionWeights::default();
        assert_eq!(w.for_algorithm("made-up"), 0.0);
    }
}
