use std::fmt;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Which embedding provider the engine builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    None,
    /// OpenAI-compatible HTTP endpoint.
    Api,
    /// Local feature-hashing embedder.
    Hashed,
}

/// Embedding subsystem configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    /// Full URL of the embeddings endpoint.
    pub endpoint: Option<String>,
    pub model: String,
    /// Bearer token. Never logged.
    pub api_key: Option<String>,
    /// Expected vector length. Required for the hashed provider, checked
    /// against API responses when set.
    pub dimensions: Option<usize>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Max entries in the shared embedding cache.
    pub cache_capacity: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::None,
            endpoint: None,
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            dimensions: None,
            timeout_secs: defaults::DEFAULT_EMBEDDING_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_EMBEDDING_MAX_RETRIES,
            cache_capacity: defaults::DEFAULT_EMBEDDING_CACHE_CAPACITY,
        }
    }
}

impl EmbeddingConfig {
    pub fn hashed_dimensions(&self) -> usize {
        self.dimensions
            .unwrap_or(defaults::DEFAULT_HASHED_DIMENSIONS)
    }
}

impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("dimensions", &self.dimensions)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}
