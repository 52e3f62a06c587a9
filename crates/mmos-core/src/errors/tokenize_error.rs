/// Tokenizer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    #[error("input is empty after trimming")]
    EmptyInput,
}
