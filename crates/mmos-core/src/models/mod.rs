mod block;
mod compressed_conversation;
mod compressed_unit;
mod conversation;
mod degradation_event;
mod fingerprint;
mod relevance;
mod token;
mod turn;

pub use block::{Block, BlockShape};
pub use compressed_conversation::{CompressedConversation, CompressionStats, ContextEntry};
pub use compressed_unit::{CompressedUnit, CompressionMethod};
pub use conversation::{ChatMessage, Conversation};
pub use degradation_event::DegradationEvent;
pub use fingerprint::Fingerprint;
pub use relevance::{RelevanceReport, RelevanceScore};
pub use token::{Token, TokenKind};
pub use turn::{content_hash, Role, Turn};
