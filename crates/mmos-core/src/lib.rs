//! # mmos-core
//!
//! Foundation crate for the mmos short-term memory engine.
//! Defines the conversation model, configuration, errors, and the traits
//! every pipeline stage plugs into. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ShortMemoryConfig;
pub use errors::{MmosError, MmosResult};
pub use traits::{IBlockCompressor, IEmbeddingProvider, IRelevanceStrategy, ISegmenter};
pub use models::{
    Block, BlockShape, CompressedConversation, CompressedUnit, CompressionMethod, ContextEntry,
    Conversation, Fingerprint, Role, Token, TokenKind, Turn,
};
