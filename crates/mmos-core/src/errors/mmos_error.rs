use super::{
    CompressionError, ConfigError, ConversationError, EmbeddingError, TokenizeError,
};

/// Top-level error for the short-term memory engine.
/// Every subsystem error converts into it via `From`.
#[derive(Debug, thiserror::Error)]
pub enum MmosError {
    #[error("tokenize error: {0}")]
    TokenizeError(#[from] TokenizeError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("compression error: {0}")]
    CompressionError(#[from] CompressionError),

    #[error("conversation error: {0}")]
    ConversationError(#[from] ConversationError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type MmosResult<T> = Result<T, MmosError>;
