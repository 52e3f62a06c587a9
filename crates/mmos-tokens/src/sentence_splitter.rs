//! Split text into sentence spans.

use std::ops::Range;

/// Split `text` into trimmed, non-empty sentence byte spans.
///
/// Any configured terminal ends a sentence, except ASCII `.` which only
/// does so before whitespace or end of text, so `4.5` stays whole.
/// Runs of terminals such as `?!` stay with their sentence.
pub fn split_sentences(text: &str, terminals: &[char]) -> Vec<Range<usize>> {
    let mut sentences = Vec::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let len = chars.len();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < len {
        let (_, c) = chars[i];
        if !terminals.contains(&c) || !is_boundary(&chars, i) {
            i += 1;
            continue;
        }

        // Swallow a run of terminals.
        let mut j = i + 1;
        while j < len && terminals.contains(&chars[j].1) && chars[j].1 != '\n' {
            j += 1;
        }
        let end = chars.get(j).map(|(b, _)| *b).unwrap_or(text.len());
        push_trimmed(text, start..end, &mut sentences);
        start = end;
        i = j;
    }

    push_trimmed(text, start..text.len(), &mut sentences);
    sentences
}

fn is_boundary(chars: &[(usize, char)], i: usize) -> bool {
    if chars[i].1 != '.' {
        return true;
    }
    match chars.get(i + 1) {
        None => true,
        Some((_, next)) => next.is_whitespace() || *next == '.',
    }
}

fn push_trimmed(text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let start = range.start + leading;
    out.push(start..start + trimmed.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERMINALS: &[char] = &['.', '!', '?', ';', '。', '！', '？', '；', '\n'];

    fn texts<'a>(text: &'a str) -> Vec<&'a str> {
        split_sentences(text, TERMINALS)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn splits_basic_sentences() {
        assert_eq!(
            texts("Hello world. This is a test. Final sentence."),
            vec!["Hello world.", "This is a test.", "Final sentence."]
        );
    }

    #[test]
    fn decimal_point_is_not_a_boundary() {
        assert_eq!(
            texts("Version 4.5 shipped. Nice"),
            vec!["Version 4.5 shipped.", "Nice"]
        );
    }

    #[test]
    fn cjk_terminals_split_without_spaces() {
        assert_eq!(
            texts("巴黎有什么好玩的？推荐卢浮宫。埃菲尔铁塔也不错！"),
            vec!["巴黎有什么好玩的？", "推荐卢浮宫。", "埃菲尔铁塔也不错！"]
        );
    }

    #[test]
    fn terminal_runs_stay_together() {
        assert_eq!(texts("Really?! Yes."), vec!["Really?!", "Yes."]);
    }

    #[test]
    fn handles_empty_and_whitespace() {
        assert!(split_sentences("", TERMINALS).is_empty());
        assert!(split_sentences("  \n ", TERMINALS).is_empty());
    }

    #[test]
    fn newline_ends_a_sentence() {
        assert_eq!(texts("first line\nsecond line"), vec!["first line", "second line"]);
    }
}
