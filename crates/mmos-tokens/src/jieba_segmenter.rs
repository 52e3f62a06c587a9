//! Dictionary word segmentation for Chinese.

use std::sync::{Arc, OnceLock};

use jieba_rs::Jieba;
use mmos_core::models::{Token, TokenKind};
use mmos_core::traits::ISegmenter;

use crate::segmenter::{is_cjk, UnicodeSegmenter};

/// Cuts CJK runs into dictionary words with jieba (HMM enabled for unknown
/// words). Everything outside a CJK run goes through [`UnicodeSegmenter`],
/// so numbers and Latin words tokenize exactly as they do by default.
pub struct JiebaSegmenter {
    jieba: Jieba,
    fallback: UnicodeSegmenter,
}

impl std::fmt::Debug for JiebaSegmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiebaSegmenter").finish_non_exhaustive()
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl JiebaSegmenter {
    /// Loads the bundled dictionary. Prefer [`shared`](Self::shared).
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
            fallback: UnicodeSegmenter::new(),
        }
    }

    /// One process-wide instance; the dictionary is loaded on first use.
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<JiebaSegmenter>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::new())).clone()
    }

    fn segment_run(&self, run: &str, cjk: bool, offset: usize, tokens: &mut Vec<Token>) {
        if cjk {
            self.cut_cjk(run, offset, tokens);
        } else {
            tokens.extend(self.fallback.segment(run, offset));
        }
    }

    fn cut_cjk(&self, run: &str, offset: usize, tokens: &mut Vec<Token>) {
        let mut cursor = 0;
        for word in self.jieba.cut(run, true) {
            let Some(found) = run[cursor..].find(word) else {
                continue;
            };
            let start = cursor + found;
            let end = start + word.len();
            cursor = end;
            if word.chars().all(is_cjk) {
                tokens.push(Token::new(word, offset + start..offset + end, TokenKind::Cjk));
            }
        }
    }
}

impl ISegmenter for JiebaSegmenter {
    fn segment(&self, sentence: &str, offset: usize) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut run_start = 0;
        let mut run_is_cjk: Option<bool> = None;

        for (i, c) in sentence.char_indices() {
            let cjk = is_cjk(c);
            match run_is_cjk {
                Some(current) if current != cjk => {
                    let run = &sentence[run_start..i];
                    self.segment_run(run, current, offset + run_start, &mut tokens);
                    run_start = i;
                    run_is_cjk = Some(cjk);
                }
                None => run_is_cjk = Some(cjk),
                _ => {}
            }
        }
        if let Some(current) = run_is_cjk {
            let run = &sentence[run_start..];
            self.segment_run(run, current, offset + run_start, &mut tokens);
        }
        tokens
    }

    fn name(&self) -> &str {
        "jieba"
    }
}
