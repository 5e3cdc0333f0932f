//! YAKE-style statistical features (frequency, dispersion, first position),
//! inverted so higher is better.

use std::collections::BTreeMap;

use super::{max_normalize, ngram_positions, AnalyzedText, KeytermAlgorithm};

#[derive(Debug, Clone)]
pub struct Yake {
    /// Longest n-gram considered.
    pub max_ngram: usize,
    /// Token-count segment size used to measure dispersion.
    pub segment_size: usize,
}

impl Default for Yake {
    fn default() -> Self {
        Self { max_ngram: 3, segment_size: 50 }
    }
}

impl KeytermAlgorithm for Yake {
    fn name(&self) -> &'static str {
        "yake"
    }

    fn score(&self, doc: &AnalyzedText) -> anyhow::Result<BTreeMap<String, f64>> {
        let total = doc.lemmas.len();
        if total == 0 {
            return Ok(BTreeMap::new());
        }
        let segments = total.div_ceil(self.segment_size).max(1) as f64;

        let mut scores = BTreeMap::new();
        for (term, positions) in ngram_positions(&doc.lemmas, self.max_ngram) {
            let freq = positions.len() as f64;

            // Dispersion: share of segments the term reaches.
            let mut seen = positions
                .iter()
                .map(|p| p / self.segment_size)
                .collect::<Vec<_>>();
            seen.dedup();
            let spread = seen.len() as f64 / segments;

            // Badness grows with a late first appearance, shrinks with
            // frequency and dispersion (original formulation ranks low
            // scores best; inverted here).
            let rel_pos = 1.0 + positions[0] as f64 / total as f64;
            let badness = rel_pos / (freq * spread.max(f64::EPSILON));
            scores.insert(term, 1.0 / (1.0 + badness));
        }

        Ok(max_normalize(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn doc(text: &str) -> AnalyzedText {
        AnalyzedText {
            lemmas: text.split_whitespace().map(str::to_string).collect(),
            entities: BTreeSet::new(),
        }
    }

    #[test]
    fn test_empty_input() {
        let scores = Yake::default().score(&doc("")).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_frequent_term_beats_rare_term() {
        let scores = Yake::default()
            .score(&doc("python testing python deployment python docs sketching"))
            .unwrap();
        assert!(scores["python"] > scores["sketching"]);
    }

    #[test]
    fn test_dispersed_term_beats_clustered_term() {
        // Both appear twice; "audit" spans two segments, "intake" one.
        let mut words: Vec<&str> = vec!["audit", "intake", "intake"];
        words.extend(std::iter::repeat("filler").take(60));
        words.push("audit");
        let text = words.join(" ");

        let scores = Yake::default().score(&doc(&text)).unwrap();
        assert!(scores["audit"] > scores["intake"]);
    }

    #[test]
    fn test_phrases_scored() {
        let scores = Yake::default()
            .score(&doc("site reliability engineering and site reliability practice"))
            .unwrap();
        assert!(scores.contains_key("site reliability"));
    }
}
