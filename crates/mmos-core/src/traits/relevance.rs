use crate::models::Fingerprint;

/// Pairwise relevance between two fingerprinted turns.
///
/// Implementations must be symmetric: `score(a, b) == score(b, a)`.
pub trait IRelevanceStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Similarity in [-1, 1]. Never fails; strategies that need embeddings
    /// fall back to lexical scoring when one is missing.
    fn score(&self, a: &Fingerprint, b: &Fingerprint) -> f64;

    /// Whether fingerprints should carry embeddings for this strategy.
    fn uses_embeddings(&self) -> bool;
}
