//! Connectivity scoring: terms that co-occur with many distinct terms in
//! a wide window score higher (weighted degree centrality).

use std::collections::{BTreeMap, BTreeSet};

use super::{is_candidate_token, max_normalize, AnalyzedText, KeytermAlgorithm};

#[derive(Debug, Clone)]
pub struct Scake {
    /// Co-occurrence window; wider than TextRank's so connectivity spans
    /// clause boundaries.
    pub window_size: usize,
}

impl Default for Scake {
    fn default() -> Self {
        Self { window_size: 10 }
    }
}

impl KeytermAlgorithm for Scake {
    fn name(&self) -> &'static str {
        "scake"
    }

    fn score(&self, doc: &AnalyzedText) -> anyhow::Result<BTreeMap<String, f64>> {
        let candidates: Vec<&str> = doc
            .lemmas
            .iter()
            .map(String::as_str)
            .filter(|t| is_candidate_token(t))
            .collect();
        if candidates.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut neighbors: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        let mut freq: BTreeMap<&str, f64> = BTreeMap::new();

        for (i, &a) in candidates.iter().enumerate() {
            *freq.entry(a).or_insert(0.0) += 1.0;
            let end = (i + self.window_size).min(candidates.len());
            for &b in &candidates[i + 1..end] {
                if a == b {
                    continue;
                }
                neighbors.entry(a).or_default().insert(b);
                neighbors.entry(b).or_default().insert(a);
            }
        }

        let scores: BTreeMap<String, f64> = freq
            .iter()
            .map(|(&term, &count)| {
                let degree = neighbors.get(term).map_or(0, BTreeSet::len) as f64;
                // Frequency contributes sublinearly; connectivity dominates.
                (term.to_string(), degree * count.sqrt())
            })
            .collect();

        Ok(max_normalize(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> AnalyzedText {
        AnalyzedText {
            lemmas: text.split_whitespace().map(str::to_string).collect(),
            entities: BTreeSet::new(),
        }
    }

    #[test]
    fn test_empty_input() {
        let scores = Scake::default().score(&doc("")).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_connected_term_outscores_isolated_term() {
        // "platform" appears amid many distinct terms; the window is
        // narrowed so "legacy" at the tail sees fewer neighbors.
        let scores = Scake { window_size: 3 }
            .score(&doc("platform engineering platform reliability platform tooling legacy"))
            .unwrap();
        assert!(scores["platform"] > scores["legacy"]);
        assert_eq!(scores["platform"], 1.0);
    }

    #[test]
    fn test_deterministic() {
        let text = "search ranking search retrieval index ranking";
        let a = Scake::default().score(&doc(text)).unwrap();
        let b = Scake::default().score(&doc(text)).unwrap();
        assert_eq!(a, b);
    }
}
