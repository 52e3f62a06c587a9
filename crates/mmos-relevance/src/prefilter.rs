//! Entity pre-filter over the whole window.
//!
//! One Bloom filter holds every `(turn, entity)` pair of the window, so a
//! candidate can be rejected without scoring when it shares none of the
//! anchor's entities. Bloom filters cannot forget keys, so a filter is
//! built for one window and never updated.

use std::collections::BTreeSet;

use tracing::debug;

use crate::bloom::BloomFilter;
use crate::fingerprint_index::FingerprintIndex;

#[derive(Debug, Clone)]
pub struct PreFilter {
    filter: BloomFilter,
}

impl PreFilter {
    pub fn build(index: &FingerprintIndex, error_rate: f64) -> Self {
        let fingerprints = index.fingerprints();
        let expected: usize = fingerprints.iter().map(|f| f.entity_set.len()).sum();
        let mut filter = BloomFilter::with_rate(expected, error_rate);
        for fingerprint in &fingerprints {
            for entity in &fingerprint.entity_set {
                filter.insert(&Self::key(fingerprint.sequence_index, entity));
            }
        }
        debug!(
            keys = filter.len(),
            bits = filter.num_bits(),
            hashes = filter.num_hashes(),
            "built entity pre-filter"
        );
        Self { filter }
    }

    fn key(sequence_index: u64, entity: &str) -> Vec<u8> {
        format!("{sequence_index}\u{1f}{entity}").into_bytes()
    }

    /// Whether turn `sequence_index` might contain `entity`.
    pub fn might_contain(&self, sequence_index: u64, entity: &str) -> bool {
        self.filter
            .might_contain(&Self::key(sequence_index, entity))
    }

    /// Whether the candidate may share any anchor entity. An anchor with no
    /// entities gives the filter nothing to test, so everything passes.
    pub fn passes(&self, sequence_index: u64, anchor_entities: &BTreeSet<String>) -> bool {
        anchor_entities.is_empty()
            || anchor_entities
                .iter()
                .any(|e| self.might_contain(sequence_index, e))
    }

    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }
}
