use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
    sequence_index: u64,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>, sequence_index: u64) -> Self {
        Self {
            role,
            content: content.into(),
            sequence_index,
        }
    }

    pub fn user(content: impl Into<String>, sequence_index: u64) -> Self {
        Self::new(Role::User, content, sequence_index)
    }

    pub fn assistant(content: impl Into<String>, sequence_index: u64) -> Self {
        Self::new(Role::Assistant, content, sequence_index)
    }

    pub fn system(content: impl Into<String>, sequence_index: u64) -> Self {
        Self::new(Role::System, content, sequence_index)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sequence_index(&self) -> u64 {
        self.sequence_index
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// blake3 hex digest of the content. Keys every content-addressed cache.
    pub fn content_hash(&self) -> String {
        content_hash(&self.content)
    }
}

/// blake3 hex digest of arbitrary text.
pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}
