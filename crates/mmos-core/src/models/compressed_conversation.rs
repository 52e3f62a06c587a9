use serde::{Deserialize, Serialize};

use super::{CompressedUnit, Conversation, DegradationEvent, Role, Turn};
use crate::errors::ConversationError;

/// One element of the compressed context, in original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextEntry {
    Compressed(CompressedUnit),
    Verbatim(Turn),
}

impl ContextEntry {
    /// Sequence index of the first source turn.
    pub fn sequence_index(&self) -> Option<u64> {
        match self {
            Self::Compressed(unit) => unit.source_block.first_sequence_index(),
            Self::Verbatim(turn) => Some(turn.sequence_index()),
        }
    }

    /// Render as a single turn. Compressed units keep the block's role when
    /// it is uniform and become system notes otherwise.
    pub fn to_turn(&self) -> Option<Turn> {
        match self {
            Self::Verbatim(turn) => Some(turn.clone()),
            Self::Compressed(unit) => {
                let index = unit.source_block.first_sequence_index()?;
                let role = unit.source_block.uniform_role().unwrap_or(Role::System);
                Some(Turn::new(role, unit.compressed_text.clone(), index))
            }
        }
    }
}

/// Counters describing what one compression call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub input_turns: usize,
    pub retained_turns: usize,
    pub dropped_turns: usize,
    pub blocks: usize,
    pub verbatim_fallbacks: usize,
    pub scored_candidates: usize,
    pub skipped_candidates: usize,
}

/// Result of compressing a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressedConversation {
    pub entries: Vec<ContextEntry>,
    /// Set when embedding scoring failed and the lexical path was used.
    pub degradation: Option<DegradationEvent>,
    pub stats: CompressionStats,
}

impl CompressedConversation {
    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    pub fn compressed_units(&self) -> impl Iterator<Item = &CompressedUnit> {
        self.entries.iter().filter_map(|e| match e {
            ContextEntry::Compressed(unit) => Some(unit),
            ContextEntry::Verbatim(_) => None,
        })
    }

    pub fn verbatim_turns(&self) -> impl Iterator<Item = &Turn> {
        self.entries.iter().filter_map(|e| match e {
            ContextEntry::Verbatim(turn) => Some(turn),
            ContextEntry::Compressed(_) => None,
        })
    }

    /// Render back into a plain conversation.
    pub fn to_conversation(&self) -> Result<Conversation, ConversationError> {
        Conversation::from_turns(self.entries.iter().filter_map(ContextEntry::to_turn).collect())
    }
}
