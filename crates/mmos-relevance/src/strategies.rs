//! Relevance strategies.

use mmos_core::config::{ShortMemoryConfig, SimilarityMetric, StrategyKind};
use mmos_core::models::Fingerprint;
use mmos_core::traits::IRelevanceStrategy;

use crate::similarity::{sparse_cosine, vector_similarity};

/// Cosine similarity of TF-IDF term weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalStrategy;

impl IRelevanceStrategy for LexicalStrategy {
    fn name(&self) -> &str {
        "algorithm"
    }

    fn score(&self, a: &Fingerprint, b: &Fingerprint) -> f64 {
        sparse_cosine(&a.term_weights, &b.term_weights)
    }

    fn uses_embeddings(&self) -> bool {
        false
    }
}

/// Weighted sum of embedding similarity and lexical cosine. Scores
/// lexically when either side has no embedding.
#[derive(Debug, Clone, Copy)]
pub struct HybridStrategy {
    embedding_weight: f64,
    lexical_weight: f64,
    metric: SimilarityMetric,
}

impl HybridStrategy {
    /// Weights are normalized to sum to one.
    pub fn new(embedding_weight: f64, lexical_weight: f64) -> Self {
        let total = embedding_weight + lexical_weight;
        let (embedding_weight, lexical_weight) = if total > 0.0 {
            (embedding_weight / total, lexical_weight / total)
        } else {
            (0.0, 1.0)
        };
        Self {
            embedding_weight,
            lexical_weight,
            metric: SimilarityMetric::default(),
        }
    }

    /// Compare embeddings with `metric` instead of cosine.
    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn weights(&self) -> (f64, f64) {
        (self.embedding_weight, self.lexical_weight)
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }
}

impl IRelevanceStrategy for HybridStrategy {
    fn name(&self) -> &str {
        "ai"
    }

    fn score(&self, a: &Fingerprint, b: &Fingerprint) -> f64 {
        let lexical = sparse_cosine(&a.term_weights, &b.term_weights);
        match (&a.embedding, &b.embedding) {
            (Some(ea), Some(eb)) => {
                let semantic = vector_similarity(self.metric, ea, eb);
                (self.embedding_weight * semantic + self.lexical_weight * lexical).clamp(-1.0, 1.0)
            }
            _ => lexical,
        }
    }

    fn uses_embeddings(&self) -> bool {
        true
    }
}

/// Pick the strategy for `config`. `auto` resolves to the hybrid strategy
/// only when an embedding provider exists.
pub fn strategy_for(
    config: &ShortMemoryConfig,
    has_provider: bool,
) -> Box<dyn IRelevanceStrategy> {
    let hybrid = match config.strategy {
        StrategyKind::Ai => true,
        StrategyKind::Algorithm => false,
        StrategyKind::Auto => has_provider,
    };
    if hybrid && has_provider {
        Box::new(
            HybridStrategy::new(config.embedding_weight, config.lexical_weight)
                .with_metric(config.similarity_metric),
        )
    } else {
        Box::new(LexicalStrategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(seq: u64, terms: &[(&str, f64)], embedding: Option<Vec<f32>>) -> Fingerprint {
        let mut f = Fingerprint::empty(seq, format!("h{seq}"));
        for (t, w) in terms {
            f.term_weights.insert(t.to_string(), *w);
        }
        f.embedding = embedding;
        f
    }

    #[test]
    fn hybrid_mixes_components() {
        let strategy = HybridStrategy::new(0.7, 0.3);
        let a = fp(0, &[("x", 1.0)], Some(vec![1.0, 0.0]));
        let b = fp(1, &[("y", 1.0)], Some(vec![1.0, 0.0]));
        assert!((strategy.score(&a, &b) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn hybrid_without_embeddings_is_lexical() {
        let strategy = HybridStrategy::new(0.7, 0.3);
        let a = fp(0, &[("x", 1.0)], None);
        let b = fp(1, &[("x", 1.0)], Some(vec![1.0]));
        assert!((strategy.score(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hybrid_uses_configured_metric() {
        let strategy = HybridStrategy::new(1.0, 0.0).with_metric(SimilarityMetric::Euclidean);
        let a = fp(0, &[("x", 1.0)], Some(vec![0.0, 0.0]));
        let b = fp(1, &[("x", 1.0)], Some(vec![3.0, 4.0]));
        assert!((strategy.score(&a, &b) - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(strategy.score(&a, &b), strategy.score(&b, &a));
    }

    #[test]
    fn weights_are_normalized() {
        assert_eq!(HybridStrategy::new(2.0, 2.0).weights(), (0.5, 0.5));
    }

    #[test]
    fn auto_depends_on_provider() {
        let config = ShortMemoryConfig::default();
        assert_eq!(strategy_for(&config, true).name(), "ai");
        assert_eq!(strategy_for(&config, false).name(), "algorithm");

        let config = ShortMemoryConfig {
            strategy: StrategyKind::Algorithm,
            ..Default::default()
        };
        assert_eq!(strategy_for(&config, true).name(), "algorithm");
    }
}
