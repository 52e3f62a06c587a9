use std::collections::BTreeMap;
use std::sync::Arc;

use mmos_compression::{contains_item, CompressionEngine};
use mmos_core::config::CompressionStrategy;
use mmos_core::models::{Block, Fingerprint, Turn};
use mmos_core::traits::{CompressionContext, IBlockCompressor};
use mmos_tokens::{find_markers, Tokenizer};
use proptest::prelude::*;

fn strategy() -> impl Strategy<Value = CompressionStrategy> {
    prop_oneof![
        Just(CompressionStrategy::Extractive),
        Just(CompressionStrategy::GraphSummary),
        Just(CompressionStrategy::Template),
    ]
}

fn turns() -> impl Strategy<Value = Vec<Turn>> {
    prop::collection::vec(
        (any::<bool>(), "[a-zA-Z0-9 .,?！？。卢浮宫巴黎不吗]{1,60}"),
        1..5,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (user, text))| {
                if user {
                    Turn::user(text, i as u64)
                } else {
                    Turn::assistant(text, i as u64)
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn numbers_and_markers_survive(turns in turns(), strategy in strategy(), keep in 0.0f64..=1.0) {
        let tokenizer = Arc::new(Tokenizer::default());
        let engine = CompressionEngine::new(tokenizer.clone(), strategy, keep, 2);
        let fingerprints: BTreeMap<u64, Fingerprint> = BTreeMap::new();
        let ranks: BTreeMap<String, f64> = BTreeMap::new();
        let block = Block::new(turns.clone(), "general", vec![]);

        let unit = engine
            .compress_block(&block, &CompressionContext { fingerprints: &fingerprints, keyword_ranks: &ranks })
            .expect("non-empty blocks always compress");

        for turn in &turns {
            for marker in find_markers(turn.content()) {
                let text = &turn.content()[marker.span];
                prop_assert!(contains_item(&unit.compressed_text, text), "lost marker {:?}", text);
            }
            if let Ok(tokenized) = tokenizer.tokenize(turn.content()) {
                for token in tokenized.tokens().filter(|t| t.is_number()) {
                    let text = &turn.content()[token.span.clone()];
                    prop_assert!(contains_item(&unit.compressed_text, text), "lost number {:?}", text);
                }
            }
        }
    }

    #[test]
    fn compression_is_deterministic(turns in turns(), strategy in strategy()) {
        let engine = CompressionEngine::new(Arc::new(Tokenizer::default()), strategy, 0.5, 2);
        let fingerprints: BTreeMap<u64, Fingerprint> = BTreeMap::new();
        let ranks: BTreeMap<String, f64> = BTreeMap::new();
        let context = CompressionContext { fingerprints: &fingerprints, keyword_ranks: &ranks };
        let block = Block::new(turns, "general", vec![]);
        prop_assert_eq!(
            engine.compress_block(&block, &context),
            engine.compress_block(&block, &context)
        );
    }
}
