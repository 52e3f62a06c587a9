//! Negation and interrogative markers.
//!
//! These carry meaning that compression must never drop, so they are kept
//! out of stop-word lists and scanned directly on the raw text.

use std::ops::Range;

use crate::segmenter::is_cjk;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "neither", "nor", "cannot", "without",
];

const INTERROGATIVES: &[&str] = &[
    "what", "why", "how", "when", "where", "which", "who", "whom", "whose", "whether",
];

const CJK_NEGATIONS: &[&str] = &["不", "没", "无", "别", "非", "未", "莫", "勿"];

/// Includes the question marks themselves.
const CJK_INTERROGATIVES: &[&str] = &[
    "吗", "呢", "什么", "怎么", "怎样", "为什么", "哪", "谁", "多少", "几", "如何", "是否", "？",
    "?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Negation,
    Interrogative,
}

/// One marker occurrence in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub span: Range<usize>,
    pub kind: MarkerKind,
}

/// Every marker occurrence in `text`, ordered by position.
///
/// Latin markers match whole words case-insensitively (any `n't`
/// contraction counts as a negation). CJK markers and question marks match
/// as substrings.
pub fn find_markers(text: &str) -> Vec<Marker> {
    let mut found = Vec::new();

    for (span, word) in latin_words(text) {
        let lower = word.to_lowercase();
        if let Some(kind) = latin_kind(&lower) {
            found.push(Marker { span, kind });
        }
    }

    for (list, kind) in [
        (CJK_NEGATIONS, MarkerKind::Negation),
        (CJK_INTERROGATIVES, MarkerKind::Interrogative),
    ] {
        for marker in list {
            for (start, m) in text.match_indices(marker) {
                found.push(Marker {
                    span: start..start + m.len(),
                    kind,
                });
            }
        }
    }

    found.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| b.span.end.cmp(&a.span.end))
    });
    found
}

/// Whether `text` reads as a question.
pub fn is_question(text: &str) -> bool {
    find_markers(text)
        .iter()
        .any(|m| m.kind == MarkerKind::Interrogative)
}

/// Whether a normalized term is, or contains, a marker. Such terms may
/// never be treated as stop words.
pub fn is_marker_term(term: &str) -> bool {
    if latin_kind(term).is_some() {
        return true;
    }
    CJK_NEGATIONS
        .iter()
        .chain(CJK_INTERROGATIVES.iter())
        .any(|m| term.contains(m))
}

fn latin_kind(lower: &str) -> Option<MarkerKind> {
    if NEGATIONS.contains(&lower) || lower.ends_with("n't") || lower.ends_with("n\u{2019}t") {
        Some(MarkerKind::Negation)
    } else if INTERROGATIVES.contains(&lower) {
        Some(MarkerKind::Interrogative)
    } else {
        None
    }
}

/// Maximal runs of non-CJK letters, allowing inner apostrophes.
fn latin_words(text: &str) -> Vec<(Range<usize>, &str)> {
    let is_letter = |c: char| c.is_alphabetic() && !is_cjk(c);
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut words = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !is_letter(chars[i].1) {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() {
            let c = chars[j].1;
            if is_letter(c) {
                j += 1;
            } else if matches!(c, '\'' | '\u{2019}')
                && j + 1 < chars.len()
                && is_letter(chars[j + 1].1)
            {
                j += 2;
            } else {
                break;
            }
        }
        let start = chars[i].0;
        let end = chars[j - 1].0 + chars[j - 1].1.len_utf8();
        words.push((start..end, &text[start..end]));
        i = j;
    }
    words
}
