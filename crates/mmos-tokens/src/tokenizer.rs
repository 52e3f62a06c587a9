//! The tokenizer front door: sentences, segmentation, stop words.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use mmos_core::config::{SegmenterKind, TokenizerConfig};
use mmos_core::errors::TokenizeError;
use mmos_core::models::Token;
use mmos_core::traits::ISegmenter;

use crate::jieba_segmenter::JiebaSegmenter;
use crate::segmenter::UnicodeSegmenter;
use crate::sentence_splitter::split_sentences;
use crate::stopwords::StopWords;

/// One sentence and its content tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub span: Range<usize>,
    pub tokens: Vec<Token>,
}

/// Tokenized turn text. Spans index into the original string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenizedText {
    pub sentences: Vec<Sentence>,
}

impl TokenizedText {
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    pub fn terms(&self) -> Vec<String> {
        self.tokens().map(|t| t.term.clone()).collect()
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(|s| s.tokens.len()).sum()
    }

    /// True when no content token survived stop-word removal.
    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }
}

/// Splits text into sentences, segments each one, and drops stop words.
#[derive(Clone)]
pub struct Tokenizer {
    segmenter: Arc<dyn ISegmenter>,
    stop_words: StopWords,
    terminals: Vec<char>,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("segmenter", &self.segmenter.name())
            .field("stop_words", &self.stop_words.len())
            .field("terminals", &self.terminals)
            .finish()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

impl Tokenizer {
    /// Tokenizer with the segmenter `config` selects.
    pub fn new(config: &TokenizerConfig) -> Self {
        let segmenter: Arc<dyn ISegmenter> = match config.segmenter {
            SegmenterKind::Unicode => Arc::new(UnicodeSegmenter::new()),
            SegmenterKind::Jieba => JiebaSegmenter::shared(),
        };
        Self::with_segmenter(config, segmenter)
    }

    /// Use a custom segmenter, e.g. a dictionary-based one for Chinese.
    pub fn with_segmenter(config: &TokenizerConfig, segmenter: Arc<dyn ISegmenter>) -> Self {
        let mut stop_words = match &config.stop_words {
            Some(words) => StopWords::from_words(words),
            None => StopWords::default(),
        };
        stop_words.extend(&config.extra_stop_words);
        Self {
            segmenter,
            stop_words,
            terminals: config.terminals(),
        }
    }

    /// Tokenize one turn. Fails only when the text is empty after trimming.
    pub fn tokenize(&self, text: &str) -> Result<TokenizedText, TokenizeError> {
        if text.trim().is_empty() {
            return Err(TokenizeError::EmptyInput);
        }
        let sentences = self
            .sentences(text)
            .into_iter()
            .map(|span| {
                let tokens = self
                    .segmenter
                    .segment(&text[span.clone()], span.start)
                    .into_iter()
                    .filter(|t| !self.stop_words.contains(&t.term))
                    .collect();
                Sentence { span, tokens }
            })
            .collect();
        Ok(TokenizedText { sentences })
    }

    /// Content terms in order of appearance.
    pub fn terms(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        Ok(self.tokenize(text)?.terms())
    }

    pub fn sentences(&self, text: &str) -> Vec<Range<usize>> {
        split_sentences(text, &self.terminals)
    }

    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }
}
