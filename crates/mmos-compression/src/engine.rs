use std::sync::Arc;

use mmos_core::config::{CompressionStrategy, ShortMemoryConfig};
use mmos_core::errors::CompressionError;
use mmos_core::models::{Block, BlockShape, CompressedUnit, CompressionMethod};
use mmos_core::traits::{CompressionContext, IBlockCompressor};
use mmos_tokens::Tokenizer;
use tracing::debug;

use crate::preservation::{collect_items, verify, TurnAnalysis};
use crate::shapes::{extractive, graph_summary, qa_template};

/// Dispatches each Block to the compressor its shape calls for, capped by
/// the configured strategy.
#[derive(Debug, Clone)]
pub struct CompressionEngine {
    tokenizer: Arc<Tokenizer>,
    strategy: CompressionStrategy,
    keep_ratio: f64,
    summary_sentences: usize,
}

impl CompressionEngine {
    pub fn new(
        tokenizer: Arc<Tokenizer>,
        strategy: CompressionStrategy,
        keep_ratio: f64,
        summary_sentences: usize,
    ) -> Self {
        Self {
            tokenizer,
            strategy,
            keep_ratio: keep_ratio.clamp(0.0, 1.0),
            summary_sentences: summary_sentences.max(1),
        }
    }

    pub fn from_config(tokenizer: Arc<Tokenizer>, config: &ShortMemoryConfig) -> Self {
        Self::new(
            tokenizer,
            config.compression_strategy,
            config.keep_ratio,
            config.summary_sentences,
        )
    }

    pub fn strategy(&self) -> CompressionStrategy {
        self.strategy
    }

    fn per_turn(&self, turns: &[TurnAnalysis]) -> String {
        match turns {
            [only] => extractive::extract(only, self.keep_ratio),
            _ => turns
                .iter()
                .map(|t| {
                    format!(
                        "{}: {}",
                        t.turn.role(),
                        extractive::extract(t, self.keep_ratio)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl IBlockCompressor for CompressionEngine {
    fn compress_block(
        &self,
        block: &Block,
        context: &CompressionContext<'_>,
    ) -> Result<CompressedUnit, CompressionError> {
        let shape = block.shape();
        if shape == BlockShape::Empty {
            return Err(CompressionError::EmptyBlock);
        }

        let analyses: Vec<TurnAnalysis> = block
            .turns
            .iter()
            .map(|turn| {
                TurnAnalysis::analyze(
                    &self.tokenizer,
                    turn,
                    context.fingerprints.get(&turn.sequence_index()),
                )
            })
            .collect();

        let (compressed_text, method) = match (shape, self.strategy) {
            (BlockShape::QuestionAnswer, CompressionStrategy::Template)
                if qa_template::applies(&analyses[0], &analyses[1]) =>
            {
                (
                    qa_template::render(
                        &block.topic_label,
                        &analyses[0],
                        &analyses[1],
                        self.keep_ratio,
                    ),
                    CompressionMethod::QaTemplate,
                )
            }
            (BlockShape::MultiTurn, CompressionStrategy::Template)
            | (BlockShape::MultiTurn, CompressionStrategy::GraphSummary) => (
                graph_summary::summarize(
                    &block.topic_label,
                    &analyses,
                    context.keyword_ranks,
                    self.summary_sentences,
                ),
                CompressionMethod::GraphSummary,
            ),
            _ => (self.per_turn(&analyses), CompressionMethod::Extractive),
        };

        verify(&compressed_text, &analyses)?;

        debug!(
            first = block.first_sequence_index(),
            turns = block.len(),
            ?shape,
            ?method,
            "compressed block"
        );

        Ok(CompressedUnit {
            source_block: block.clone(),
            compressed_text,
            preserved_entities: collect_items(&analyses),
            method,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use mmos_core::models::{Fingerprint, Turn};

    use super::*;

    fn engine(strategy: CompressionStrategy) -> CompressionEngine {
        CompressionEngine::new(Arc::new(Tokenizer::default()), strategy, 0.5, 2)
    }

    fn fingerprints(turns: &[Turn], entities: &[&str]) -> BTreeMap<u64, Fingerprint> {
        turns
            .iter()
            .map(|t| {
                let mut fp = Fingerprint::empty(t.sequence_index(), t.content_hash());
                fp.entity_set = entities.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
                (t.sequence_index(), fp)
            })
            .collect()
    }

    fn compress(
        engine: &CompressionEngine,
        turns: Vec<Turn>,
        entities: &[&str],
    ) -> Result<CompressedUnit, CompressionError> {
        let fps = fingerprints(&turns, entities);
        let ranks = BTreeMap::from([("louvre".to_string(), 0.6), ("ticket".to_string(), 0.3)]);
        let block = Block::new(turns, "louvre/ticket", vec!["louvre".into(), "ticket".into()]);
        engine.compress_block(
            &block,
            &CompressionContext {
                fingerprints: &fps,
                keyword_ranks: &ranks,
            },
        )
    }

    #[test]
    fn empty_block_is_an_error() {
        let err = compress(&engine(CompressionStrategy::Template), vec![], &[]).unwrap_err();
        assert_eq!(err, CompressionError::EmptyBlock);
    }

    #[test]
    fn single_turn_is_extractive() {
        let unit = compress(
            &engine(CompressionStrategy::Template),
            vec![Turn::user("Is the Louvre open on Tuesday?", 3)],
            &["louvre"],
        )
        .unwrap();
        assert_eq!(unit.method, CompressionMethod::Extractive);
        assert!(unit.compressed_text.contains("Louvre"));
        assert!(unit.compressed_text.contains('?'));
        assert_eq!(unit.preserved_entities, vec!["Louvre", "?"]);
    }

    #[test]
    fn question_answer_uses_template() {
        let unit = compress(
            &engine(CompressionStrategy::Template),
            vec![
                Turn::user("How much is a Louvre ticket?", 0),
                Turn::assistant("A Louvre ticket costs 17 euros.", 1),
            ],
            &["louvre"],
        )
        .unwrap();
        assert_eq!(unit.method, CompressionMethod::QaTemplate);
        assert!(unit.compressed_text.starts_with("[louvre/ticket] Q: "));
        assert!(unit.compressed_text.ends_with("A: Louvre 17"));
    }

    #[test]
    fn graph_summary_strategy_compresses_pairs_turn_by_turn() {
        let unit = compress(
            &engine(CompressionStrategy::GraphSummary),
            vec![
                Turn::user("How much is a Louvre ticket?", 0),
                Turn::assistant("A Louvre ticket costs 17 euros.", 1),
            ],
            &["louvre"],
        )
        .unwrap();
        assert_eq!(unit.method, CompressionMethod::Extractive);
        let lines: Vec<&str> = unit.compressed_text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("user: "));
        assert!(lines[1].starts_with("assistant: "));
    }

    #[test]
    fn multi_turn_block_is_summarized() {
        let unit = compress(
            &engine(CompressionStrategy::Template),
            vec![
                Turn::user("Tell me about the Louvre.", 0),
                Turn::assistant("The Louvre is the largest museum. A ticket costs 17 euros.", 1),
                Turn::user("Is the ticket refundable?", 2),
            ],
            &["louvre"],
        )
        .unwrap();
        assert_eq!(unit.method, CompressionMethod::GraphSummary);
        assert!(unit.compressed_text.starts_with("[louvre/ticket] "));
        for item in &unit.preserved_entities {
            assert!(unit.compressed_text.contains(item.as_str()), "lost {item}");
        }
    }

    #[test]
    fn extractive_strategy_never_summarizes() {
        let unit = compress(
            &engine(CompressionStrategy::Extractive),
            vec![
                Turn::user("Tell me about the Louvre.", 0),
                Turn::assistant("It opened in 1793.", 1),
                Turn::user("Why not earlier?", 2),
            ],
            &["louvre"],
        )
        .unwrap();
        assert_eq!(unit.method, CompressionMethod::Extractive);
        assert_eq!(unit.compressed_text.lines().count(), 3);
        assert!(unit.compressed_text.contains("1793"));
        assert!(unit.compressed_text.contains("not"));
    }

    #[test]
    fn summary_keeps_standalone_number_next_to_longer_one() {
        let unit = compress(
            &engine(CompressionStrategy::Template),
            vec![
                Turn::user("Tell me about the louvre museum.", 0),
                Turn::assistant("The louvre museum opened in 1793. Doors open at 9 sharp.", 1),
                Turn::user("Great louvre museum.", 2),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(unit.method, CompressionMethod::GraphSummary);
        assert_eq!(unit.preserved_entities, vec!["1793", "9"]);
        assert!(unit.compressed_text.ends_with(" | 9"));
    }
}
