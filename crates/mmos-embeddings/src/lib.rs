//! # mmos-embeddings
//!
//! Dense embeddings for relevance scoring.
//!
//! - `ApiEmbeddingProvider`: OpenAI-compatible HTTP endpoint
//! - `HashedEmbeddingProvider`: local feature hashing, always available
//! - `EmbeddingCache`: process-wide LRU keyed by content hash
//! - `EmbeddingService`: one batched provider request per call, cache first

pub mod cache;
pub mod providers;
pub mod service;

pub use cache::EmbeddingCache;
pub use providers::{create_provider, ApiEmbeddingProvider, HashedEmbeddingProvider};
pub use service::{EmbeddingRequest, EmbeddingService};
