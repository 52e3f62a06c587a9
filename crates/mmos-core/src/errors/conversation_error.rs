/// Conversation construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    #[error("sequence index {found} does not follow {previous}")]
    NonMonotonicSequence { previous: u64, found: u64 },
}
