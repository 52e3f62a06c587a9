mod compression_error;
mod config_error;
mod conversation_error;
mod embedding_error;
mod mmos_error;
mod tokenize_error;

pub use compression_error::CompressionError;
pub use config_error::ConfigError;
pub use conversation_error::ConversationError;
pub use embedding_error::EmbeddingError;
pub use mmos_error::{MmosError, MmosResult};
pub use tokenize_error::TokenizeError;
