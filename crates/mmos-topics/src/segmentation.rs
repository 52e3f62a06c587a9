//! Topic Block segmentation.

use std::collections::BTreeSet;

use mmos_core::config::ShortMemoryConfig;
use mmos_core::models::{Block, Turn};
use tracing::debug;

use crate::keyword_graph::KeywordGraph;
use crate::textrank::{rank_keywords, KeywordRanks, RankParams};

const FALLBACK_LABEL: &str = "general";

/// A turn and its content terms in order of appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnTerms {
    pub turn: Turn,
    pub terms: Vec<String>,
}

impl TurnTerms {
    pub fn new(turn: Turn, terms: Vec<String>) -> Self {
        Self { turn, terms }
    }
}

/// Blocks in order, plus the keyword ranks they were cut with.
#[derive(Debug, Clone, Default)]
pub struct TopicAnalysis {
    pub blocks: Vec<Block>,
    pub ranks: KeywordRanks,
}

#[derive(Debug, Clone)]
pub struct TopicSegmenter {
    cooccurrence_window: usize,
    topic_keywords: usize,
    label_keywords: usize,
    rank: RankParams,
}

impl TopicSegmenter {
    pub fn new(
        cooccurrence_window: usize,
        topic_keywords: usize,
        label_keywords: usize,
        rank: RankParams,
    ) -> Self {
        Self {
            cooccurrence_window,
            topic_keywords,
            label_keywords,
            rank,
        }
    }

    pub fn from_config(config: &ShortMemoryConfig) -> Self {
        Self::new(
            config.cooccurrence_window,
            config.topic_keywords,
            config.label_keywords,
            RankParams::from_config(config),
        )
    }

    /// Keyword centrality over all runs. Co-occurrence stays inside a run.
    pub fn rank(&self, runs: &[Vec<TurnTerms>]) -> KeywordRanks {
        let mut graph = KeywordGraph::new();
        for run in runs {
            let terms: Vec<Vec<String>> = run.iter().map(|t| t.terms.clone()).collect();
            graph.add_turns(&terms, self.cooccurrence_window);
        }
        debug!(
            keywords = graph.node_count(),
            edges = graph.edge_count(),
            "keyword graph built"
        );
        rank_keywords(&graph, self.rank)
    }

    /// A turn's top keywords by centrality.
    pub fn top_keywords(&self, ranks: &KeywordRanks, terms: &[String]) -> Vec<String> {
        ranks.rank_terms(terms.iter().map(String::as_str), self.topic_keywords)
    }

    /// Cut each run of contiguous turns into Blocks. A turn joins the open
    /// Block when its top keywords meet the Block's keywords, or when it has
    /// none at all; otherwise it opens a new Block. Blocks never span runs.
    pub fn segment(&self, runs: &[Vec<TurnTerms>]) -> TopicAnalysis {
        let ranks = self.rank(runs);
        let mut blocks = Vec::new();

        for run in runs {
            let mut open: Option<OpenBlock> = None;
            for item in run {
                let top = self.top_keywords(&ranks, &item.terms);
                match open.as_mut() {
                    Some(block) if top.is_empty() || block.overlaps(&top) => {
                        block.push(item.turn.clone(), top);
                    }
                    _ => {
                        if let Some(done) = open.take() {
                            blocks.push(self.close(done, &ranks));
                        }
                        let mut block = OpenBlock::default();
                        block.push(item.turn.clone(), top);
                        open = Some(block);
                    }
                }
            }
            if let Some(done) = open {
                blocks.push(self.close(done, &ranks));
            }
        }

        debug!(blocks = blocks.len(), "topic segmentation done");
        TopicAnalysis { blocks, ranks }
    }

    fn close(&self, open: OpenBlock, ranks: &KeywordRanks) -> Block {
        let keywords = ranks.rank_terms(open.keywords.iter().map(String::as_str), usize::MAX);
        let label = if keywords.is_empty() {
            FALLBACK_LABEL.to_string()
        } else {
            keywords
                .iter()
                .take(self.label_keywords)
                .cloned()
                .collect::<Vec<_>>()
                .join("/")
        };
        Block::new(open.turns, label, keywords)
    }
}

#[derive(Debug, Default)]
struct OpenBlock {
    turns: Vec<Turn>,
    keywords: BTreeSet<String>,
}

impl OpenBlock {
    fn overlaps(&self, top: &[String]) -> bool {
        top.iter().any(|k| self.keywords.contains(k))
    }

    fn push(&mut self, turn: Turn, top: Vec<String>) {
        self.turns.push(turn);
        self.keywords.extend(top);
    }
}
