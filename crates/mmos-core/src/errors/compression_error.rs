/// Compression errors. Recovered per Block by emitting the Block's turns
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompressionError {
    #[error("compressed text dropped preserved item {item:?} from turn {sequence_index}")]
    PreservationViolated { sequence_index: u64, item: String },

    #[error("cannot compress an empty block")]
    EmptyBlock,
}
