use serde::{Deserialize, Serialize};

use super::Block;

/// Which compressor produced a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMethod {
    Extractive,
    QaTemplate,
    GraphSummary,
}

/// The compressed rendition of one Block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedUnit {
    pub source_block: Block,
    pub compressed_text: String,
    /// Items that must survive compression, in order of first appearance.
    pub preserved_entities: Vec<String>,
    pub method: CompressionMethod,
}
