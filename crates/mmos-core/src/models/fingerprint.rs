use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Lexical summary of one turn, relative to the window it was computed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub sequence_index: u64,
    pub content_hash: String,
    /// Term -> TF-IDF weight.
    pub term_weights: BTreeMap<String, f64>,
    /// The `entity_top_n` heaviest terms.
    pub entity_set: BTreeSet<String>,
    /// Dense vector, when an embedding provider is in play.
    pub embedding: Option<Vec<f32>>,
}

impl Fingerprint {
    pub fn empty(sequence_index: u64, content_hash: impl Into<String>) -> Self {
        Self {
            sequence_index,
            content_hash: content_hash.into(),
            term_weights: BTreeMap::new(),
            entity_set: BTreeSet::new(),
            embedding: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.term_weights.is_empty()
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Terms ordered by weight descending, ties by term ascending.
    pub fn ranked_terms(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .term_weights
            .iter()
            .map(|(t, w)| (t.as_str(), *w))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }
}
