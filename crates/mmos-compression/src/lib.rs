//! # mmos-compression
//!
//! Compresses topic Blocks, choosing the compressor by Block shape:
//!
//! - single turn: extractive, keeping preserved spans plus the heaviest terms
//! - question + answer: `[topic] Q: ... A: ...` template
//! - three or more turns: keyword-centrality sentence summary
//!
//! Numbers, entities, negations and interrogatives always survive; a unit
//! that would drop one is rejected.

pub mod engine;
pub mod preservation;
pub mod shapes;
pub mod spans;

pub use engine::CompressionEngine;
pub use preservation::{contains_item, PreservedSet, TurnAnalysis};
pub use spans::SpanSet;
