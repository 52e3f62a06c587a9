//! Local feature-hashing embedding provider.
//!
//! Projects the tokenizer's terms into a fixed number of signed buckets.
//! Deterministic and dependency-free, so it works offline.

use std::collections::HashMap;
use std::sync::Arc;

use mmos_core::errors::EmbeddingError;
use mmos_core::traits::IEmbeddingProvider;
use mmos_tokens::Tokenizer;

/// Feature-hashing embedder over tokenizer terms.
///
/// Terms sharing a bucket may cancel or reinforce each other; the sign bit
/// keeps the expected collision bias at zero.
pub struct HashedEmbeddingProvider {
    dimensions: usize,
    tokenizer: Arc<Tokenizer>,
}

impl HashedEmbeddingProvider {
    pub fn new(dimensions: usize, tokenizer: Arc<Tokenizer>) -> Self {
        Self {
            dimensions: dimensions.max(1),
            tokenizer,
        }
    }

    /// FNV-1a over the term bytes.
    fn hash_term(term: &str) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        h
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        let Ok(terms) = self.tokenizer.terms(text) else {
            return vec;
        };

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for term in &terms {
            *tf.entry(term.as_str()).or_default() += 1.0;
        }

        for (term, count) in tf {
            let h = Self::hash_term(term);
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            // Sublinear TF.
            vec[bucket] += sign * (1.0 + count.ln());
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashedEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed"
    }

    fn is_available(&self) -> bool {
        true
    }
}
