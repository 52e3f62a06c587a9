use serde::{Deserialize, Serialize};

use super::{Role, Turn};

/// Structural shape of a Block, which decides the compressor applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockShape {
    Empty,
    SingleUser,
    SingleAssistant,
    SingleSystem,
    /// A user turn immediately answered by an assistant turn.
    QuestionAnswer,
    /// Any other two-turn block.
    Pair,
    MultiTurn,
}

/// A maximal run of contiguous relevant turns sharing a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub turns: Vec<Turn>,
    pub topic_label: String,
    /// Union of the member turns' top keywords, highest ranked first.
    pub keywords: Vec<String>,
}

impl Block {
    pub fn new(turns: Vec<Turn>, topic_label: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            turns,
            topic_label: topic_label.into(),
            keywords,
        }
    }

    pub fn shape(&self) -> BlockShape {
        match self.turns.as_slice() {
            [] => BlockShape::Empty,
            [only] => match only.role() {
                Role::User => BlockShape::SingleUser,
                Role::Assistant => BlockShape::SingleAssistant,
                Role::System => BlockShape::SingleSystem,
            },
            [first, second] => {
                if first.role() == Role::User && second.role() == Role::Assistant {
                    BlockShape::QuestionAnswer
                } else {
                    BlockShape::Pair
                }
            }
            _ => BlockShape::MultiTurn,
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn first_sequence_index(&self) -> Option<u64> {
        self.turns.first().map(Turn::sequence_index)
    }

    /// The shared role of every member turn, if there is one.
    pub fn uniform_role(&self) -> Option<Role> {
        let first = self.turns.first()?.role();
        self.turns
            .iter()
            .all(|t| t.role() == first)
            .then_some(first)
    }
}
