use mmos_core::models::Turn;
use mmos_topics::{rank_keywords, KeywordGraph, RankParams, TopicSegmenter, TurnTerms};
use proptest::prelude::*;

fn item(seq: u64, terms: &[&str]) -> TurnTerms {
    let turn = if seq % 2 == 0 {
        Turn::user(terms.join(" "), seq)
    } else {
        Turn::assistant(terms.join(" "), seq)
    };
    TurnTerms::new(turn, terms.iter().map(|s| s.to_string()).collect())
}

fn segmenter() -> TopicSegmenter {
    TopicSegmenter::new(3, 5, 2, RankParams::default())
}

#[test]
fn interleaving_order_does_not_change_block_count() {
    let museum = [
        item(0, &["louvre", "museum", "wing", "mona", "lisa"]),
        item(1, &["louvre", "museum", "denon", "wing"]),
    ];
    let bread = [
        item(2, &["sourdough", "bread", "dough", "proof"]),
        item(3, &["sourdough", "bread", "dough", "hours"]),
    ];

    let forward: Vec<TurnTerms> = museum.iter().chain(bread.iter()).cloned().collect();
    let backward: Vec<TurnTerms> = bread.iter().chain(museum.iter()).cloned().collect();

    for run in [forward, backward] {
        let analysis = segmenter().segment(&[run]);
        assert_eq!(analysis.blocks.len(), 2);
        assert_ne!(analysis.blocks[0].topic_label, analysis.blocks[1].topic_label);
        for block in &analysis.blocks {
            assert_eq!(block.len(), 2);
        }
    }
}

#[test]
fn ranks_sum_to_one_on_connected_graph() {
    let graph = KeywordGraph::from_turns(
        &[
            vec!["paris".into(), "louvre".into()],
            vec!["louvre".into(), "ticket".into()],
            vec!["ticket".into(), "price".into()],
        ],
        3,
    );
    let ranks = rank_keywords(&graph, RankParams::default());
    let total: f64 = ranks.as_map().values().sum();
    assert!((total - 1.0).abs() < 1e-4, "total {total}");
}

proptest! {
    #[test]
    fn blocks_cover_every_turn_in_order(
        terms in prop::collection::vec(prop::collection::vec("[a-e]", 0..4), 1..10)
    ) {
        let run: Vec<TurnTerms> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let refs: Vec<&str> = t.iter().map(String::as_str).collect();
                item(i as u64, &refs)
            })
            .collect();
        let analysis = segmenter().segment(&[run.clone()]);
        let flattened: Vec<u64> = analysis
            .blocks
            .iter()
            .flat_map(|b| b.turns.iter().map(Turn::sequence_index))
            .collect();
        let expected: Vec<u64> = (0..run.len() as u64).collect();
        prop_assert_eq!(flattened, expected);
        for block in &analysis.blocks {
            prop_assert!(!block.topic_label.is_empty());
        }
    }
}
