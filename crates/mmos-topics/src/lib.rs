//! # mmos-topics
//!
//! Groups relevant turns into topic Blocks.
//!
//! Keywords that co-occur within a few turns of each other are linked in a
//! weighted graph; PageRank-style centrality over that graph ranks them.
//! Consecutive turns whose top keywords overlap share a Block.

pub mod keyword_graph;
pub mod segmentation;
pub mod textrank;

pub use keyword_graph::KeywordGraph;
pub use segmentation::{TopicAnalysis, TopicSegmenter, TurnTerms};
pub use textrank::{rank_keywords, KeywordRanks, RankParams};
