//! Default word segmentation.

use mmos_core::models::{Token, TokenKind};
use mmos_core::traits::ISegmenter;

/// Script-aware segmenter that needs no dictionary.
///
/// Latin-like words are lowercased, digit runs become number tokens,
/// Han/Kana/Hangul runs are cut into overlapping character bigrams, and
/// any other visible symbol is passed through unchanged as its own token.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl UnicodeSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl ISegmenter for UnicodeSegmenter {
    fn segment(&self, sentence: &str, offset: usize) -> Vec<Token> {
        let chars: Vec<(usize, char)> = sentence.char_indices().collect();
        let end_of = |k: usize| chars[k].0 + chars[k].1.len_utf8();
        let mut tokens = Vec::new();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            let c = chars[i].1;
            if c.is_whitespace() || is_punctuation(c) {
                i += 1;
                continue;
            }

            if c.is_numeric() && !is_cjk(c) {
                let mut j = i + 1;
                while j < len {
                    let next = chars[j].1;
                    if next.is_numeric() && !is_cjk(next) {
                        j += 1;
                    } else if matches!(next, '.' | ',')
                        && j + 1 < len
                        && chars[j + 1].1.is_numeric()
                        && !is_cjk(chars[j + 1].1)
                    {
                        j += 2;
                    } else {
                        break;
                    }
                }
                let span = chars[i].0..end_of(j - 1);
                tokens.push(Token::new(
                    &sentence[span.clone()],
                    shift(span, offset),
                    TokenKind::Number,
                ));
                i = j;
            } else if is_cjk(c) {
                let mut j = i + 1;
                while j < len && is_cjk(chars[j].1) {
                    j += 1;
                }
                if j - i == 1 {
                    let span = chars[i].0..end_of(i);
                    tokens.push(Token::new(
                        &sentence[span.clone()],
                        shift(span, offset),
                        TokenKind::Cjk,
                    ));
                } else {
                    for k in i..j - 1 {
                        let span = chars[k].0..end_of(k + 1);
                        tokens.push(Token::new(
                            &sentence[span.clone()],
                            shift(span, offset),
                            TokenKind::Cjk,
                        ));
                    }
                }
                i = j;
            } else if is_word_char(c) {
                let mut j = i + 1;
                while j < len {
                    let next = chars[j].1;
                    if is_word_char(next) {
                        j += 1;
                    } else if matches!(next, '\'' | '\u{2019}' | '_')
                        && j + 1 < len
                        && is_word_char(chars[j + 1].1)
                    {
                        j += 2;
                    } else {
                        break;
                    }
                }
                let span = chars[i].0..end_of(j - 1);
                tokens.push(Token::new(
                    sentence[span.clone()].to_lowercase(),
                    shift(span, offset),
                    TokenKind::Word,
                ));
                i = j;
            } else {
                let span = chars[i].0..end_of(i);
                tokens.push(Token::new(
                    &sentence[span.clone()],
                    shift(span, offset),
                    TokenKind::Other,
                ));
                i += 1;
            }
        }

        tokens
    }

    fn name(&self) -> &str {
        "unicode"
    }
}

fn shift(span: std::ops::Range<usize>, offset: usize) -> std::ops::Range<usize> {
    span.start + offset..span.end + offset
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() && !is_cjk(c)
}

/// Han ideographs, Kana, and Hangul syllables.
pub fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3040..=0x30FF      // Hiragana, Katakana
        | 0x3400..=0x4DBF    // CJK Extension A
        | 0x4E00..=0x9FFF    // CJK Unified Ideographs
        | 0xAC00..=0xD7AF    // Hangul syllables
        | 0xF900..=0xFAFF    // CJK Compatibility Ideographs
        | 0x20000..=0x2A6DF) // CJK Extension B
}

/// Punctuation never becomes a token. Unit-like symbols (`%`, `$`) do.
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation() && !matches!(c, '%' | '$' | '#' | '@' | '+' | '&');
    }
    matches!(c as u32,
        0x00A1 | 0x00AB | 0x00B7 | 0x00BB | 0x00BF
        | 0x2010..=0x2027    // dashes, quotes, ellipsis
        | 0x2030..=0x205E
        | 0x3000..=0x303F    // CJK symbols and punctuation
        | 0xFE10..=0xFE1F
        | 0xFE30..=0xFE4F
        | 0xFF01..=0xFF0F    // fullwidth ASCII punctuation
        | 0xFF1A..=0xFF20
        | 0xFF3B..=0xFF40
        | 0xFF5B..=0xFF65)
}
