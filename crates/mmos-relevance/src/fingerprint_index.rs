//! TF-IDF fingerprints over a bounded sliding window of turns.
//!
//! Document frequencies cover exactly the turns currently in the window.
//! Adding past capacity evicts the oldest turn and decrements the document
//! frequency of each of its distinct terms.
//!
//! Term counts are cached by content hash in a [`TermCache`] that several
//! indexes may share, so a turn seen in an earlier window is not tokenized
//! again.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use mmos_core::config::ShortMemoryConfig;
use mmos_core::errors::TokenizeError;
use mmos_core::models::{Fingerprint, Turn};
use mmos_tokens::Tokenizer;
use moka::sync::Cache;
use tracing::debug;

/// Raw term frequencies of one turn.
pub type TermCounts = BTreeMap<String, u32>;

/// Term counts by content hash.
pub type TermCache = Cache<String, Arc<TermCounts>>;

/// A term cache bounded to `capacity` entries.
pub fn term_cache(capacity: u64) -> TermCache {
    Cache::new(capacity.max(1))
}

#[derive(Debug, Clone)]
struct WindowEntry {
    sequence_index: u64,
    content_hash: String,
    counts: Arc<TermCounts>,
}

/// Sliding-window TF-IDF index.
pub struct FingerprintIndex {
    tokenizer: Arc<Tokenizer>,
    window_size: usize,
    entity_top_n: usize,
    window: VecDeque<WindowEntry>,
    doc_freq: HashMap<String, usize>,
    /// Survives eviction, since identical content tokenizes identically.
    term_cache: TermCache,
}

impl std::fmt::Debug for FingerprintIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintIndex")
            .field("window_size", &self.window_size)
            .field("len", &self.window.len())
            .field("terms", &self.doc_freq.len())
            .finish()
    }
}

impl FingerprintIndex {
    /// An index with a private term cache sized to the window.
    pub fn new(tokenizer: Arc<Tokenizer>, window_size: usize, entity_top_n: usize) -> Self {
        let capacity = u64::try_from(window_size)
            .unwrap_or(u64::MAX)
            .saturating_mul(2);
        Self::with_term_cache(tokenizer, window_size, entity_top_n, term_cache(capacity))
    }

    /// An index backed by a shared term cache.
    pub fn with_term_cache(
        tokenizer: Arc<Tokenizer>,
        window_size: usize,
        entity_top_n: usize,
        term_cache: TermCache,
    ) -> Self {
        Self {
            tokenizer,
            window_size: window_size.max(1),
            entity_top_n,
            // Grows with the turns actually added, never with `window_size`.
            window: VecDeque::new(),
            doc_freq: HashMap::new(),
            term_cache,
        }
    }

    pub fn from_config(
        config: &ShortMemoryConfig,
        tokenizer: Arc<Tokenizer>,
        term_cache: TermCache,
    ) -> Self {
        Self::with_term_cache(tokenizer, config.window_size, config.entity_top_n, term_cache)
    }

    /// Add a turn to the window and return its fingerprint. Re-adding a
    /// turn already in the window changes nothing.
    pub fn add(&mut self, turn: &Turn) -> Fingerprint {
        if self.contains(turn.sequence_index()) {
            return self.fingerprint(turn);
        }

        let counts = self.term_counts(turn);
        for term in counts.keys() {
            *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
        self.window.push_back(WindowEntry {
            sequence_index: turn.sequence_index(),
            content_hash: turn.content_hash(),
            counts,
        });

        while self.window.len() > self.window_size {
            if let Some(evicted) = self.window.pop_front() {
                self.forget(&evicted);
                debug!(
                    sequence_index = evicted.sequence_index,
                    "evicted turn from fingerprint window"
                );
            }
        }

        self.fingerprint(turn)
    }

    fn forget(&mut self, entry: &WindowEntry) {
        for term in entry.counts.keys() {
            if let Some(df) = self.doc_freq.get_mut(term) {
                *df -= 1;
                if *df == 0 {
                    self.doc_freq.remove(term);
                }
            }
        }
    }

    fn term_counts(&self, turn: &Turn) -> Arc<TermCounts> {
        let tokenizer = &self.tokenizer;
        self.term_cache.get_with(turn.content_hash(), || {
            let mut counts = TermCounts::new();
            match tokenizer.tokenize(turn.content()) {
                Ok(tokenized) => {
                    for token in tokenized.tokens() {
                        *counts.entry(token.term.clone()).or_insert(0) += 1;
                    }
                }
                Err(TokenizeError::EmptyInput) => {
                    debug!(
                        sequence_index = turn.sequence_index(),
                        "empty turn fingerprinted as empty"
                    );
                }
            }
            Arc::new(counts)
        })
    }

    /// Fingerprint `turn` against the current window. Does not modify the
    /// window; a turn outside it simply contributes no document frequency.
    pub fn fingerprint(&self, turn: &Turn) -> Fingerprint {
        let counts = self.term_counts(turn);
        self.build(turn.sequence_index(), turn.content_hash(), &counts)
    }

    /// Fingerprints of every turn in the window, oldest first.
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.window
            .iter()
            .map(|e| self.build(e.sequence_index, e.content_hash.clone(), &e.counts))
            .collect()
    }

    fn build(&self, sequence_index: u64, content_hash: String, counts: &TermCounts) -> Fingerprint {
        let mut fingerprint = Fingerprint::empty(sequence_index, content_hash);
        for (term, tf) in counts {
            fingerprint
                .term_weights
                .insert(term.clone(), *tf as f64 * self.idf(term));
        }
        fingerprint.entity_set = fingerprint
            .ranked_terms()
            .into_iter()
            .take(self.entity_top_n)
            .map(|(t, _)| t.to_string())
            .collect();
        fingerprint
    }

    /// Smoothed inverse document frequency, `ln((1 + n) / (1 + df)) + 1`.
    /// With fewer than two documents every term weighs 1.
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.window.len();
        if n < 2 {
            return 1.0;
        }
        let df = self.doc_freq.get(term).copied().unwrap_or(0);
        ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0
    }

    /// The `n` highest-weighted terms of `turn`, ties broken by term.
    pub fn top_terms(&self, turn: &Turn, n: usize) -> Vec<String> {
        self.fingerprint(turn)
            .ranked_terms()
            .into_iter()
            .take(n)
            .map(|(t, _)| t.to_string())
            .collect()
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    pub fn contains(&self, sequence_index: u64) -> bool {
        self.window
            .iter()
            .any(|e| e.sequence_index == sequence_index)
    }

    pub fn sequence_indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.window.iter().map(|e| e.sequence_index)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}
