use serde::{Deserialize, Serialize};

use super::{Role, Turn};
use crate::errors::ConversationError;

/// A plain chat message without an index, the shape callers usually hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// An ordered list of turns with strictly increasing sequence indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pre-indexed turns, rejecting any index that does not
    /// strictly increase.
    pub fn from_turns(turns: Vec<Turn>) -> Result<Self, ConversationError> {
        for pair in turns.windows(2) {
            if pair[1].sequence_index() <= pair[0].sequence_index() {
                return Err(ConversationError::NonMonotonicSequence {
                    previous: pair[0].sequence_index(),
                    found: pair[1].sequence_index(),
                });
            }
        }
        Ok(Self { turns })
    }

    /// Build from chat messages, indexing them from zero.
    pub fn from_messages<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = ChatMessage>,
    {
        let mut conversation = Self::new();
        for message in messages {
            conversation.push(message.role, message.content);
        }
        conversation
    }

    /// Append a turn with the next sequence index and return that index.
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> u64 {
        let index = self.next_index();
        self.turns.push(Turn::new(role, content, index));
        index
    }

    fn next_index(&self) -> u64 {
        self.turns
            .last()
            .map(|t| t.sequence_index() + 1)
            .unwrap_or(0)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

impl TryFrom<Vec<Turn>> for Conversation {
    type Error = ConversationError;

    fn try_from(turns: Vec<Turn>) -> Result<Self, Self::Error> {
        Self::from_turns(turns)
    }
}

impl From<Conversation> for Vec<Turn> {
    fn from(conversation: Conversation) -> Self {
        conversation.turns
    }
}
