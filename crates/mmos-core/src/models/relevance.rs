use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One candidate scored against the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceScore {
    pub sequence_index: u64,
    pub score: f64,
    pub relevant: bool,
}

/// Per-turn relevance verdicts for one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceReport {
    /// Sequence index of the anchor user turn, if the window has one.
    pub anchor: Option<u64>,
    pub verdicts: BTreeMap<u64, bool>,
    pub scores: Vec<RelevanceScore>,
    /// Candidates rejected by the pre-filter without scoring.
    pub skipped: Vec<u64>,
}

impl RelevanceReport {
    pub fn is_relevant(&self, sequence_index: u64) -> bool {
        self.verdicts.get(&sequence_index).copied().unwrap_or(false)
    }

    pub fn score_of(&self, sequence_index: u64) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.sequence_index == sequence_index)
            .map(|s| s.score)
    }
}
