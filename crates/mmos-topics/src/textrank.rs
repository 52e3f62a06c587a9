//! Weighted PageRank over the keyword graph.

use std::collections::BTreeMap;

use mmos_core::config::ShortMemoryConfig;
use petgraph::visit::EdgeRef;

use crate::keyword_graph::KeywordGraph;

/// Iteration parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParams {
    pub damping: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            damping: 0.85,
            epsilon: 1e-6,
            max_iterations: 100,
        }
    }
}

impl RankParams {
    pub fn from_config(config: &ShortMemoryConfig) -> Self {
        Self {
            damping: config.rank_damping,
            epsilon: config.rank_epsilon,
            max_iterations: config.rank_max_iterations,
        }
    }
}

/// Keyword centrality scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordRanks {
    scores: BTreeMap<String, f64>,
}

impl KeywordRanks {
    pub fn from_scores(scores: BTreeMap<String, f64>) -> Self {
        Self { scores }
    }

    /// Centrality of `term`, 0 for unknown terms.
    pub fn score(&self, term: &str) -> f64 {
        self.scores.get(term).copied().unwrap_or(0.0)
    }

    /// The `n` most central keywords overall.
    pub fn top(&self, n: usize) -> Vec<String> {
        self.rank_terms(self.scores.keys().map(String::as_str), n)
    }

    /// The `n` most central of `terms` (deduplicated), ties broken by term.
    pub fn rank_terms<'a, I>(&self, terms: I, n: usize) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut unique: Vec<&str> = terms.into_iter().collect();
        unique.sort_unstable();
        unique.dedup();
        unique.sort_by(|a, b| {
            self.score(b)
                .partial_cmp(&self.score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        unique.into_iter().take(n).map(str::to_string).collect()
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }

    pub fn into_map(self) -> BTreeMap<String, f64> {
        self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Rank keywords: `s_i = (1 - d) / N + d * sum_j (w_ji / out_j) * s_j`.
/// Isolated keywords keep the teleport share.
pub fn rank_keywords(graph: &KeywordGraph, params: RankParams) -> KeywordRanks {
    let g = graph.inner();
    let n = g.node_count();
    if n == 0 {
        return KeywordRanks::default();
    }

    let out_weight: Vec<f64> = g
        .node_indices()
        .map(|i| g.edges(i).map(|e| *e.weight()).sum())
        .collect();

    let base = (1.0 - params.damping) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];

    for _ in 0..params.max_iterations {
        let mut next = vec![base; n];
        for i in g.node_indices() {
            let mut sum = 0.0f64;
            for edge in g.edges(i) {
                let j = if edge.source() == i {
                    edge.target()
                } else {
                    edge.source()
                };
                let out = out_weight[j.index()];
                if out > f64::EPSILON {
                    sum += edge.weight() / out * scores[j.index()];
                }
            }
            next[i.index()] += params.damping * sum;
        }

        let max_diff = next
            .iter()
            .zip(&scores)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f64, f64::max);
        scores = next;
        if max_diff < params.epsilon {
            break;
        }
    }

    KeywordRanks::from_scores(
        g.node_indices()
            .map(|i| (g[i].clone(), scores[i.index()]))
            .collect(),
    )
}
