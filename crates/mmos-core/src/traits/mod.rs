mod compressor;
mod embedding;
mod relevance;
mod segmenter;

pub use compressor::{CompressionContext, IBlockCompressor};
pub use embedding::IEmbeddingProvider;
pub use relevance::IRelevanceStrategy;
pub use segmenter::ISegmenter;
