pub mod defaults;
mod embedding_config;
mod short_memory_config;
mod tokenizer_config;

pub use embedding_config::{EmbeddingConfig, EmbeddingProviderKind};
pub use short_memory_config::{
    CompressionStrategy, ShortMemoryConfig, SimilarityMetric, StrategyKind,
};
pub use tokenizer_config::{SegmenterKind, TokenizerConfig};
