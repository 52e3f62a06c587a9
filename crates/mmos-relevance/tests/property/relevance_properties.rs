use std::sync::Arc;

use mmos_core::models::Turn;
use mmos_core::traits::IRelevanceStrategy;
use mmos_relevance::{BloomFilter, FingerprintIndex, HybridStrategy, LexicalStrategy};
use mmos_tokens::Tokenizer;
use proptest::prelude::*;

fn words() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "louvre", "paris", "ticket", "museum", "pasta", "tesla", "price", "17", "euros",
            "卢浮宫", "门票", "巴黎", "不", "吗",
        ]),
        1..8,
    )
    .prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn scores_are_symmetric(a in words(), b in words(), c in words()) {
        let mut index = FingerprintIndex::new(Arc::new(Tokenizer::default()), 10, 8);
        index.add(&Turn::user(c, 0));
        let fa = index.add(&Turn::user(a, 1));
        let fb = index.add(&Turn::user(b, 2));

        prop_assert_eq!(LexicalStrategy.score(&fa, &fb), LexicalStrategy.score(&fb, &fa));

        let hybrid = HybridStrategy::new(0.7, 0.3);
        let fa = fa.with_embedding(vec![0.3, 0.1, 0.9]);
        let fb = fb.with_embedding(vec![0.5, 0.7, 0.2]);
        prop_assert_eq!(hybrid.score(&fa, &fb), hybrid.score(&fb, &fa));
    }

    #[test]
    fn fingerprint_is_idempotent(texts in prop::collection::vec(words(), 1..6), query in words()) {
        let mut index = FingerprintIndex::new(Arc::new(Tokenizer::default()), 4, 5);
        for (i, text) in texts.into_iter().enumerate() {
            index.add(&Turn::user(text, i as u64));
        }
        let turn = Turn::user(query, 99);
        prop_assert_eq!(index.fingerprint(&turn), index.fingerprint(&turn));
    }

    #[test]
    fn window_never_exceeds_capacity(texts in prop::collection::vec(words(), 1..20), cap in 1usize..6) {
        let mut index = FingerprintIndex::new(Arc::new(Tokenizer::default()), cap, 5);
        for (i, text) in texts.iter().enumerate() {
            index.add(&Turn::user(text.clone(), i as u64));
            prop_assert!(index.len() <= cap);
        }
    }
}

#[test]
fn bloom_has_no_false_negatives_and_bounded_false_positives() {
    let n = 2_000;
    let p = 0.01;
    let mut filter = BloomFilter::with_rate(n, p);
    for i in 0..n {
        filter.insert(format!("member-{i}").as_bytes());
    }
    for i in 0..n {
        assert!(filter.might_contain(format!("member-{i}").as_bytes()));
    }

    let queries = 20_000;
    let false_positives = (0..queries)
        .filter(|i| filter.might_contain(format!("absent-{i}").as_bytes()))
        .count();
    let rate = false_positives as f64 / queries as f64;
    // Generous bound over the configured 1%.
    assert!(rate <= p * 2.0, "false positive rate {rate} too high");
}
