use std::collections::BTreeMap;

use crate::errors::CompressionError;
use crate::models::{Block, CompressedUnit, Fingerprint};

/// Window-level information a compressor may consult.
#[derive(Debug, Clone, Copy)]
pub struct CompressionContext<'a> {
    /// Fingerprints keyed by sequence index.
    pub fingerprints: &'a BTreeMap<u64, Fingerprint>,
    /// Keyword centrality over the retained turns.
    pub keyword_ranks: &'a BTreeMap<String, f64>,
}

/// Block compression.
pub trait IBlockCompressor: Send + Sync {
    /// Compress one Block. Errors are recovered by the caller emitting the
    /// Block verbatim.
    fn compress_block(
        &self,
        block: &Block,
        context: &CompressionContext<'_>,
    ) -> Result<CompressedUnit, CompressionError>;
}
