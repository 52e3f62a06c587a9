//! # mmos-relevance
//!
//! Decides which earlier turns still matter to the latest user turn.
//!
//! - `FingerprintIndex`: TF-IDF over a bounded sliding window of turns
//! - `BloomFilter` / `PreFilter`: cheap "shares an entity?" check
//! - `LexicalStrategy` / `HybridStrategy`: pairwise scores
//! - `RelevanceScorer`: anchor selection, thresholds, verdict inheritance

pub mod bloom;
pub mod fingerprint_index;
pub mod prefilter;
pub mod scorer;
pub mod similarity;
pub mod strategies;

pub use bloom::BloomFilter;
pub use fingerprint_index::{term_cache, FingerprintIndex, TermCache};
pub use prefilter::PreFilter;
pub use scorer::{CandidatePlan, RelevanceScorer};
pub use strategies::{strategy_for, HybridStrategy, LexicalStrategy};
