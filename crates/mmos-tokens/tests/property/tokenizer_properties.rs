use mmos_tokens::{find_markers, Tokenizer};
use proptest::prelude::*;

proptest! {
    #[test]
    fn token_spans_are_char_boundaries(text in "[a-zA-Z0-9 .,?！？。卢浮宫巴黎不吗]{1,60}") {
        let tokenizer = Tokenizer::default();
        if let Ok(tokenized) = tokenizer.tokenize(&text) {
            for token in tokenized.tokens() {
                prop_assert!(token.span.start < token.span.end);
                prop_assert!(token.span.end <= text.len());
                prop_assert!(text.is_char_boundary(token.span.start));
                prop_assert!(text.is_char_boundary(token.span.end));
            }
        }
    }

    #[test]
    fn tokenize_is_deterministic(text in "\\PC{1,80}") {
        let tokenizer = Tokenizer::default();
        let a = tokenizer.tokenize(&text);
        let b = tokenizer.tokenize(&text);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn marker_spans_are_in_bounds(text in "\\PC{0,80}") {
        for marker in find_markers(&text) {
            prop_assert!(marker.span.end <= text.len());
            prop_assert!(text.is_char_boundary(marker.span.start));
            prop_assert!(text.is_char_boundary(marker.span.end));
        }
    }

    #[test]
    fn sentences_are_ordered_and_disjoint(text in "[a-z .!?。？]{0,80}") {
        let sentences = Tokenizer::default().sentences(&text);
        for pair in sentences.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }
}
