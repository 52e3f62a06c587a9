//! Shared in-memory embedding cache using moka.
//!
//! Least-recently-used eviction, bounded by entry count. Cloning the handle
//! shares the underlying cache, so engines built from the same handle reuse
//! each other's embeddings.

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

/// Embedding cache keyed by blake3 content hash.
#[derive(Clone)]
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl EmbeddingCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache }
    }

    pub fn get(&self, content_hash: &str) -> Option<Vec<f32>> {
        self.cache.get(content_hash)
    }

    pub fn insert(&self, content_hash: String, embedding: Vec<f32>) {
        self.cache.insert(content_hash, embedding);
    }

    /// Approximate entry count. Pending evictions may not be reflected yet.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
