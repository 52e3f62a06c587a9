//! Cache-first, batched embedding lookups.

use std::collections::HashMap;
use std::sync::Arc;

use mmos_core::errors::EmbeddingError;
use mmos_core::traits::IEmbeddingProvider;
use tracing::{debug, info_span};

use crate::cache::EmbeddingCache;

/// Text to embed plus the content hash that keys the cache.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddingRequest<'a> {
    pub content_hash: &'a str,
    pub text: &'a str,
}

/// Wraps a provider with the shared cache. All cache misses of one call go
/// to the provider as a single batch.
#[derive(Clone)]
pub struct EmbeddingService {
    provider: Arc<dyn IEmbeddingProvider>,
    cache: EmbeddingCache,
}

impl std::fmt::Debug for EmbeddingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingService")
            .field("provider", &self.provider.name())
            .field("cache", &self.cache)
            .finish()
    }
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn IEmbeddingProvider>, cache: EmbeddingCache) -> Self {
        Self { provider, cache }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Embed every request, in order. Cached vectors are reused; the rest
    /// are fetched in one `embed_batch` call and written back to the cache.
    pub fn embed_all(
        &self,
        requests: &[EmbeddingRequest<'_>],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let _span = info_span!(
            "mmos.embedding",
            provider = self.provider.name(),
            requested = requests.len()
        )
        .entered();

        let mut resolved: HashMap<&str, Vec<f32>> = HashMap::new();
        let mut missing_hashes: Vec<&str> = Vec::new();
        let mut missing_texts: Vec<String> = Vec::new();

        for request in requests {
            if resolved.contains_key(request.content_hash)
                || missing_hashes.contains(&request.content_hash)
            {
                continue;
            }
            match self.cache.get(request.content_hash) {
                Some(vector) => {
                    resolved.insert(request.content_hash, vector);
                }
                None => {
                    missing_hashes.push(request.content_hash);
                    missing_texts.push(request.text.to_string());
                }
            }
        }

        debug!(
            cache_hits = resolved.len(),
            cache_misses = missing_texts.len(),
            "embedding cache lookup"
        );

        if !missing_texts.is_empty() {
            let fetched = self.provider.embed_batch(&missing_texts)?;
            if fetched.len() != missing_texts.len() {
                return Err(EmbeddingError::BatchSizeMismatch {
                    expected: missing_texts.len(),
                    actual: fetched.len(),
                });
            }
            let expected = match self.provider.dimensions() {
                0 => fetched.first().map(Vec::len).unwrap_or(0),
                d => d,
            };
            for (hash, vector) in missing_hashes.into_iter().zip(fetched) {
                if vector.len() != expected {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    });
                }
                self.cache.insert(hash.to_string(), vector.clone());
                resolved.insert(hash, vector);
            }
        }

        requests
            .iter()
            .map(|r| {
                resolved
                    .get(r.content_hash)
                    .cloned()
                    .ok_or_else(|| EmbeddingError::InferenceFailed {
                        reason: format!("no embedding resolved for {}", r.content_hash),
                    })
            })
            .collect()
    }
}
