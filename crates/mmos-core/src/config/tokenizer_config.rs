use serde::{Deserialize, Serialize};

use super::defaults;

/// Word segmentation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    /// Script rules only: CJK runs become character bigrams.
    #[default]
    Unicode,
    /// Dictionary words for Chinese, script rules for everything else.
    Jieba,
}

/// Tokenizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenizerConfig {
    pub segmenter: SegmenterKind,
    /// Characters that end a sentence. ASCII `.` only ends one before
    /// whitespace or end of text.
    pub sentence_terminals: String,
    /// Replaces the built-in stop word list when set.
    pub stop_words: Option<Vec<String>>,
    /// Appended to whichever stop word list is active.
    pub extra_stop_words: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterKind::default(),
            sentence_terminals: defaults::DEFAULT_SENTENCE_TERMINALS.to_string(),
            stop_words: None,
            extra_stop_words: Vec::new(),
        }
    }
}

impl TokenizerConfig {
    pub fn terminals(&self) -> Vec<char> {
        self.sentence_terminals.chars().collect()
    }
}
