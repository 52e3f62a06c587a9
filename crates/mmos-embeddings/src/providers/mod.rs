//! Embedding providers.

mod api_provider;
mod hashed_provider;

use std::sync::Arc;

pub use api_provider::ApiEmbeddingProvider;
pub use hashed_provider::HashedEmbeddingProvider;

use mmos_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use mmos_core::errors::EmbeddingError;
use mmos_core::traits::IEmbeddingProvider;
use mmos_tokens::Tokenizer;
use tracing::info;

/// Build the provider named by `config`. `none` yields no provider.
pub fn create_provider(
    config: &EmbeddingConfig,
    tokenizer: Arc<Tokenizer>,
) -> Result<Option<Arc<dyn IEmbeddingProvider>>, EmbeddingError> {
    let provider: Option<Arc<dyn IEmbeddingProvider>> = match config.provider {
        EmbeddingProviderKind::None => None,
        EmbeddingProviderKind::Hashed => Some(Arc::new(HashedEmbeddingProvider::new(
            config.hashed_dimensions(),
            tokenizer,
        ))),
        EmbeddingProviderKind::Api => Some(Arc::new(ApiEmbeddingProvider::from_config(config)?)),
    };
    if let Some(p) = &provider {
        info!(provider = p.name(), "embedding provider ready");
    }
    Ok(provider)
}
