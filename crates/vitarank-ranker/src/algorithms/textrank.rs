//! TextRank: co-occurrence graph centrality over candidate unigrams.

use std::collections::BTreeMap;

use super::{is_candidate_token, max_normalize, AnalyzedText, KeytermAlgorithm};

#[derive(Debug, Clone)]
pub struct TextRank {
    /// Co-occurrence window over the candidate token sequence.
    pub window_size: usize,
    /// Damping factor.
    pub damping: f64,
    pub max_iterations: usize,
    /// Convergence threshold on the L1 delta between iterations.
    pub threshold: f64,
}

impl Default for TextRank {
    fn default() -> Self {
        Self {
            window_size: 4,
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }
}

impl KeytermAlgorithm for TextRank {
    fn name(&self) -> &'static str {
        "textrank"
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

        // Node ids in first-encounter order; BTreeMap edges keep neighbor
        // iteration (and therefore float accumulation) deterministic.
        let mut id_of: BTreeMap<String, usize> = BTreeMap::new();
        let mut terms: Vec<&str> = Vec::new();
        let mut edges: Vec<BTreeMap<usize, f64>> = Vec::new();
        for &term in &candidates {
            if !id_of.contains_key(term) {
                id_of.insert(term.to_string(), terms.len());
                terms.push(term);
                edges.push(BTreeMap::new());
            }
        }

        for (i, &a) in candidates.iter().enumerate() {
            let end = (i + self.window_size).min(candidates.len());
            for &b in &candidates[i + 1..end] {
                if a == b {
                    continue;
                }
                let ia = id_of[a];
                let ib = id_of[b];
                *edges[ia].entry(ib).or_insert(0.0) += 1.0;
                *edges[ib].entry(ia).or_insert(0.0) += 1.0;
            }
        }

        let scores = power_iteration(&edges, self.damping, self.max_iterations, self.threshold);

        let map: BTreeMap<String, f64> = terms
            .iter()
            .zip(scores)
            .map(|(term, score)| (term.to_string(), score))
            .collect();
        Ok(max_normalize(map))
    }
}

/// Damped power iteration over a weighted undirected graph.
/// Returns even when convergence wasn't achieved within the iteration cap.
fn power_iteration(
    edges: &[BTreeMap<usize, f64>],
    damping: f64,
    max_iterations: usize,
    threshold: f64,
) -> Vec<f64> {
    let n = edges.len();
    if n == 0 {
        return Vec::new();
    }

    let totals: Vec<f64> = edges.iter().map(|e| e.values().sum()).collect();
    let teleport = (1.0 - damping) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];

    for _ in 0..max_iterations {
        // Dangling nodes spread their mass uniformly.
        let dangling: f64 = (0..n).filter(|&i| totals[i] == 0.0).map(|i| scores[i]).sum();
        next.fill(teleport + damping * dangling / n as f64);

        for (node, neighbors) in edges.iter().enumerate() {
            if totals[node] == 0.0 {
                continue;
            }
            for (&neighbor, &weight) in neighbors {
                next[neighbor] += damping * scores[node] * weight / totals[node];
            }
        }

        let delta: f64 = scores
            .iter()
            .zip(next.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();
        std::mem::swap(&mut scores, &mut next);
        if delta <= threshold {
            break;
        }
    }

    scores
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
        let scores = TextRank::default().score(&doc("")).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_hub_term_ranks_highest() {
        // "rust" co-occurs with everything else.
        let scores = TextRank::default()
            .score(&doc("rust tooling rust compiler rust ecosystem rust community"))
            .unwrap();
        let (best, _) = scores
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert_eq!(best, "rust");
        assert_eq!(scores["rust"], 1.0);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let text = "distributed systems engineer building resilient distributed services";
        let a = TextRank::default().score(&doc(text)).unwrap();
        let b = TextRank::default().score(&doc(text)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stopwords_excluded() {
        let scores = TextRank::default().score(&doc("the engineer and the compiler")).unwrap();
        assert!(!scores.contains_key("the"));
        assert!(scores.contains_key("engineer"));
    }

    #[test]
    fn test_power_iteration_uniform_on_symmetric_triangle() {
        let edges = vec![
            BTreeMap::from([(1, 1.0), (2, 1.0)]),
            BTreeMap::from([(0, 1.0), (2, 1.0)]),
            BTreeMap::from([(0, 1.0), (1, 1.0)]),
        ];
        let scores = power_iteration(&edges, 0.85, 100, 1e-6);
        for s in &scores {
            assert!((s - 1.0 / 3.0).abs() < 0.01);
        }
    }
}
