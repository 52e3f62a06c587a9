use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Alphabetic run, lowercased.
    Word,
    /// Digit run, possibly with inner `.` or `,`.
    Number,
    /// Han/Kana/Hangul character bigram (or a lone character).
    Cjk,
    /// Any other visible symbol, kept as-is.
    Other,
}

/// A normalized term plus the byte span it came from in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub term: String,
    pub span: Range<usize>,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(term: impl Into<String>, span: Range<usize>, kind: TokenKind) -> Self {
        Self {
            term: term.into(),
            span,
            kind,
        }
    }

    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }
}
