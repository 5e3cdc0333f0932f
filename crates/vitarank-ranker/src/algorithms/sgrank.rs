//! SGRank-style statistical ranking of 1..=3-grams with position decay
//! and a named-entity boost.

use std::collections::BTreeMap;

use super::{max_normalize, ngram_positions, AnalyzedText, KeytermAlgorithm};

#[derive(Debug, Clone)]
pub struct SgRank {
    /// Longest n-gram considered a candidate phrase.
    pub max_ngram: usize,
    /// Multiplier applied to candidates recognized as named entities.
    pub entity_boost: f64,
}

impl Default for SgRank {
    fn default() -> Self {
        Self { max_ngram: 3, entity_boost: 1.5 }
    }
}

impl KeytermAlgorithm for SgRank {
    fn name(&self) -> &'static str {
        "sgrank"
    }

    fn score(&self, doc: &AnalyzedText) -> anyhow::Result<BTreeMap<String, f64>> {
        let total = doc.lemmas.len();
        if total == 0 {
            return Ok(BTreeMap::new());
        }

        let mut scores = BTreeMap::new();
        for (term, positions) in ngram_positions(&doc.lemmas, self.max_ngram) {
            let freq = positions.len() as f64;
            let words = term.split(' ').count() as f64;
            // Terms introduced early weigh more.
            let first = positions[0] as f64;
            let decay = 1.0 / (1.0 + first / total as f64);

            let mut score = freq * words * decay;
            if doc.entities.contains(&term) {
                score *= self.entity_boost;
            }
            scores.insert(term, score);
        }

        Ok(max_normalize(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn doc(text: &str, entities: &[&str]) -> AnalyzedText {
        AnalyzedText {
            lemmas: text.split_whitespace().map(str::to_string).collect(),
            entities: entities.iter().map(|e| e.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_empty_input() {
        let scores = SgRank::default().score(&doc("", &[])).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_multiword_phrases_emitted() {
        let scores = SgRank::default()
            .score(&doc("machine learning engineer machine learning", &[]))
            .unwrap();
        assert!(scores.contains_key("machine"));
        assert!(scores.contains_key("machine learning"));
        assert!(scores.contains_key("machine learning engineer"));
    }

    #[test]
    fn test_entity_boost_raises_score() {
        let plain = SgRank::default()
            .score(&doc("cloud platform work cloud migration", &[]))
            .unwrap();
        let boosted = SgRank::default()
            .score(&doc("cloud platform work cloud migration", &["platform"]))
            .unwrap();
        // Relative standing of the boosted term improves after normalization.
        let plain_ratio = plain["platform"] / plain["cloud"];
        let boosted_ratio = boosted["platform"] / boosted["cloud"];
        assert!(boosted_ratio > plain_ratio);
    }

    #[test]
    fn test_earlier_term_beats_equal_later_term() {
        let scores = SgRank::default()
            .score(&doc("kubernetes deployment pipeline observability", &[]))
            .unwrap();
        assert!(scores["kubernetes"] > scores["observability"]);
    }
}
