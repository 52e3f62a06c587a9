use mmos_compression::contains_item;
use mmos_core::models::{ContextEntry, Conversation, Role, Turn};
use mmos_core::ShortMemoryConfig;
use mmos_short_memory::ShortMemoryEngine;
use mmos_tokens::Tokenizer;
use proptest::prelude::*;

const TEXT: &str = "(louvre|museum|ticket|bread|dough|巴黎|卢浮宫|天气|not|why|[0-9]{1,3}|\\?| ){1,12}";

fn conversation(max_turns: usize) -> impl Strategy<Value = Conversation> {
    prop::collection::vec((0u8..10, TEXT), 0..max_turns).prop_map(|raw| {
        let mut conversation = Conversation::new();
        for (i, (roll, text)) in raw.into_iter().enumerate() {
            let role = match (roll, i % 2) {
                (0, _) => Role::System,
                (_, 0) => Role::User,
                _ => Role::Assistant,
            };
            conversation.push(role, text);
        }
        conversation
    })
}

fn engine(threshold: f64) -> ShortMemoryEngine {
    ShortMemoryEngine::new(ShortMemoryConfig {
        similarity_threshold: threshold,
        ..Default::default()
    })
    .unwrap()
}

proptest! {
    #[test]
    fn short_conversations_are_unchanged(input in conversation(3)) {
        prop_assume!(input.len() <= 2);
        let out = engine(0.5).compress(&input);
        prop_assert_eq!(out.to_conversation().unwrap(), input);
    }

    #[test]
    fn tail_is_verbatim_and_order_is_kept(input in conversation(12), threshold in 0.0f64..=1.0) {
        let out = engine(threshold).compress(&input);
        let rendered = out.to_conversation();
        prop_assert!(rendered.is_ok());
        let rendered = rendered.unwrap().into_turns();
        let tail = input.len().min(2);
        prop_assert_eq!(&rendered[rendered.len() - tail..], &input.turns()[input.len() - tail..]);
    }

    #[test]
    fn retained_turns_keep_numbers_and_markers(input in conversation(12)) {
        let tokenizer = Tokenizer::default();
        let out = engine(0.0).compress(&input);
        for entry in &out.entries {
            let ContextEntry::Compressed(unit) = entry else { continue };
            for turn in &unit.source_block.turns {
                for marker in mmos_tokens::find_markers(turn.content()) {
                    let text = &turn.content()[marker.span];
                    prop_assert!(contains_item(&unit.compressed_text, text));
                }
                if let Ok(tokenized) = tokenizer.tokenize(turn.content()) {
                    for token in tokenized.tokens().filter(|t| t.is_number()) {
                        prop_assert!(contains_item(&unit.compressed_text, &turn.content()[token.span.clone()]));
                    }
                }
            }
        }
    }

    #[test]
    fn score_is_symmetric(a in TEXT, b in TEXT) {
        let engine = engine(0.5);
        let (ta, tb) = (Turn::user(a, 0), Turn::user(b, 1));
        let ab = engine.score(&ta, &tb);
        let ba = engine.score(&tb, &ta);
        prop_assert!((ab - ba).abs() < 1e-12);
        prop_assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn fingerprint_is_repeatable(text in TEXT) {
        let engine = engine(0.5);
        let turn = Turn::user(text, 0);
        prop_assert_eq!(
            engine.fingerprint(&turn).term_weights,
            engine.fingerprint(&turn).term_weights
        );
    }
}
