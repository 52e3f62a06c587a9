//! Byte-span sets and reassembly of kept text.

use std::ops::Range;

use mmos_tokens::segmenter::is_cjk;

/// Sorted, non-overlapping byte ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanSet {
    spans: Vec<Range<usize>>,
}

impl SpanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a range, merging anything it overlaps or touches.
    pub fn insert(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let mut merged = range;
        let mut out = Vec::with_capacity(self.spans.len() + 1);
        let mut placed = false;
        for span in self.spans.drain(..) {
            if span.end < merged.start {
                out.push(span);
            } else if span.start > merged.end {
                if !placed {
                    out.push(merged.clone());
                    placed = true;
                }
                out.push(span);
            } else {
                merged = merged.start.min(span.start)..merged.end.max(span.end);
            }
        }
        if !placed {
            out.push(merged);
        }
        self.spans = out;
    }

    pub fn extend<I: IntoIterator<Item = Range<usize>>>(&mut self, ranges: I) {
        for range in ranges {
            self.insert(range);
        }
    }

    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Total bytes covered.
    pub fn covered(&self) -> usize {
        self.spans.iter().map(|s| s.end - s.start).sum()
    }

    /// Concatenate the kept slices of `text` in order. Segments are joined
    /// by a space when the dropped gap held whitespace or ASCII
    /// punctuation, or when joining them directly would merge two digit or
    /// letter runs. Otherwise they are joined directly (CJK text has no
    /// spaces).
    pub fn render(&self, text: &str) -> String {
        let mut out = String::new();
        let mut previous_end: Option<usize> = None;
        for span in &self.spans {
            if let Some(end) = previous_end {
                let gap = &text[end..span.start];
                let merges = match (out.chars().next_back(), text[span.clone()].chars().next()) {
                    (Some(left), Some(right)) => glued(left, right),
                    _ => false,
                };
                if merges
                    || gap
                        .chars()
                        .any(|c| c.is_whitespace() || c.is_ascii_punctuation())
                {
                    out.push(' ');
                }
            }
            out.push_str(&text[span.clone()]);
            previous_end = Some(span.end);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Letter,
}

fn char_class(c: char) -> Option<CharClass> {
    if is_cjk(c) {
        None
    } else if c.is_numeric() {
        Some(CharClass::Digit)
    } else if c.is_alphabetic() {
        Some(CharClass::Letter)
    } else {
        None
    }
}

/// Whether `right` written directly after `left` continues the same digit
/// or letter run.
pub fn glued(left: char, right: char) -> bool {
    matches!((char_class(left), char_class(right)), (Some(a), Some(b)) if a == b)
}

pub(crate) fn is_digit(c: char) -> bool {
    char_class(c) == Some(CharClass::Digit)
}
