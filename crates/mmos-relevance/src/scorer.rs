//! Relevance verdicts for the turns of one window.
//!
//! Only user turns are scored, each against the anchor (the most recent
//! user turn). Assistant turns inherit the verdict of the user turn before
//! them. Scoring happens in two phases so that the caller can embed exactly
//! the candidates that survive the pre-filter in one batch.

use std::collections::{BTreeMap, HashMap};

use mmos_core::config::ShortMemoryConfig;
use mmos_core::models::{Fingerprint, RelevanceReport, RelevanceScore, Role, Turn};
use mmos_core::traits::IRelevanceStrategy;
use tracing::debug;

use crate::prefilter::PreFilter;

/// Which candidates get scored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePlan {
    pub anchor: Option<u64>,
    /// Fewer than two user turns: everything is relevant.
    pub all_relevant: bool,
    pub to_score: Vec<u64>,
    pub skipped: Vec<u64>,
}

impl CandidatePlan {
    /// Sequence indices that need embeddings: the anchor plus every
    /// candidate to score.
    pub fn embedding_targets(&self) -> Vec<u64> {
        self.anchor
            .iter()
            .copied()
            .chain(self.to_score.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer {
    threshold: f64,
    preserve_last_n: usize,
}

impl RelevanceScorer {
    pub fn new(threshold: f64, preserve_last_n: usize) -> Self {
        Self {
            threshold,
            preserve_last_n,
        }
    }

    pub fn from_config(config: &ShortMemoryConfig) -> Self {
        Self::new(config.similarity_threshold, config.preserve_last_n)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Choose the anchor and split the user turns of `window[..judged_len]`
    /// into candidates to score and candidates the pre-filter rejects. The
    /// `preserve_last_n` candidates nearest the anchor bypass the filter.
    pub fn plan(
        &self,
        window: &[Turn],
        judged_len: usize,
        fingerprints: &BTreeMap<u64, Fingerprint>,
        prefilter: &PreFilter,
    ) -> CandidatePlan {
        let user_turns = window.iter().filter(|t| t.is_user()).count();
        let anchor = window
            .iter()
            .rev()
            .find(|t| t.is_user())
            .map(Turn::sequence_index);

        if user_turns < 2 {
            return CandidatePlan {
                anchor,
                all_relevant: true,
                ..Default::default()
            };
        }

        let candidates: Vec<u64> = window[..judged_len.min(window.len())]
            .iter()
            .filter(|t| t.is_user() && Some(t.sequence_index()) != anchor)
            .map(Turn::sequence_index)
            .collect();
        let exempt_from = candidates.len().saturating_sub(self.preserve_last_n);

        let anchor_entities = anchor
            .and_then(|a| fingerprints.get(&a))
            .map(|f| f.entity_set.clone())
            .unwrap_or_default();

        let mut plan = CandidatePlan {
            anchor,
            ..Default::default()
        };
        for (position, seq) in candidates.into_iter().enumerate() {
            if position >= exempt_from || prefilter.passes(seq, &anchor_entities) {
                plan.to_score.push(seq);
            } else {
                plan.skipped.push(seq);
            }
        }
        debug!(
            scored = plan.to_score.len(),
            skipped = plan.skipped.len(),
            "relevance candidates selected"
        );
        plan
    }

    /// Score the planned candidates and assign a verdict to every turn of
    /// `window[..judged_len]`.
    pub fn judge(
        &self,
        plan: &CandidatePlan,
        window: &[Turn],
        judged_len: usize,
        fingerprints: &BTreeMap<u64, Fingerprint>,
        strategy: &dyn IRelevanceStrategy,
    ) -> RelevanceReport {
        let judged = &window[..judged_len.min(window.len())];
        let mut report = RelevanceReport {
            anchor: plan.anchor,
            skipped: plan.skipped.clone(),
            ..Default::default()
        };

        if plan.all_relevant {
            for turn in judged {
                report.verdicts.insert(turn.sequence_index(), true);
            }
            return report;
        }

        let mut user_verdicts: HashMap<u64, bool> = HashMap::new();
        if let Some(anchor) = plan.anchor {
            user_verdicts.insert(anchor, true);
            let anchor_fp = fingerprints.get(&anchor);
            for seq in &plan.to_score {
                let score = match (fingerprints.get(seq), anchor_fp) {
                    (Some(candidate), Some(anchor_fp)) => strategy.score(candidate, anchor_fp),
                    _ => 0.0,
                };
                let relevant = score >= self.threshold;
                user_verdicts.insert(*seq, relevant);
                report.scores.push(RelevanceScore {
                    sequence_index: *seq,
                    score,
                    relevant,
                });
            }
        }

        let mut previous_user: Option<bool> = None;
        for turn in judged {
            let verdict = match turn.role() {
                Role::User => {
                    let v = user_verdicts
                        .get(&turn.sequence_index())
                        .copied()
                        .unwrap_or(false);
                    previous_user = Some(v);
                    v
                }
                Role::Assistant => previous_user.unwrap_or(false),
                Role::System => true,
            };
            report.verdicts.insert(turn.sequence_index(), verdict);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mmos_tokens::Tokenizer;

    use super::*;
    use crate::fingerprint_index::FingerprintIndex;
    use crate::strategies::LexicalStrategy;

    struct Fixture {
        window: Vec<Turn>,
        fingerprints: BTreeMap<u64, Fingerprint>,
        prefilter: PreFilter,
    }

    fn fixture(turns: &[(Role, &str)]) -> Fixture {
        let mut index = FingerprintIndex::new(Arc::new(Tokenizer::default()), 100, 8);
        let window: Vec<Turn> = turns
            .iter()
            .enumerate()
            .map(|(i, (role, text))| Turn::new(*role, *text, i as u64))
            .collect();
        for turn in &window {
            index.add(turn);
        }
        let fingerprints = index
            .fingerprints()
            .into_iter()
            .map(|f| (f.sequence_index, f))
            .collect();
        let prefilter = PreFilter::build(&index, 0.01);
        Fixture {
            window,
            fingerprints,
            prefilter,
        }
    }

    #[test]
    fn single_user_turn_makes_everything_relevant() {
        let f = fixture(&[(Role::Assistant, "welcome"), (Role::User, "hello there")]);
        let scorer = RelevanceScorer::new(0.5, 2);
        let plan = scorer.plan(&f.window, 2, &f.fingerprints, &f.prefilter);
        assert!(plan.all_relevant);
        let report = scorer.judge(&plan, &f.window, 2, &f.fingerprints, &LexicalStrategy);
        assert!(report.is_relevant(0));
        assert!(report.is_relevant(1));
    }

    #[test]
    fn assistant_inherits_user_verdict() {
        let f = fixture(&[
            (Role::User, "louvre museum tickets"),
            (Role::Assistant, "tickets cost 17 euros"),
            (Role::User, "pasta carbonara recipe"),
            (Role::Assistant, "use guanciale"),
            (Role::User, "louvre museum hours"),
        ]);
        let scorer = RelevanceScorer::new(0.3, 2);
        let plan = scorer.plan(&f.window, 4, &f.fingerprints, &f.prefilter);
        assert_eq!(plan.anchor, Some(4));
        let report = scorer.judge(&plan, &f.window, 4, &f.fingerprints, &LexicalStrategy);
        assert!(report.is_relevant(0));
        assert!(report.is_relevant(1));
        assert!(!report.is_relevant(2));
        assert!(!report.is_relevant(3));
    }

    #[test]
    fn threshold_is_inclusive() {
        let f = fixture(&[(Role::User, "alpha"), (Role::User, "alpha")]);
        let scorer = RelevanceScorer::new(1.0, 2);
        let plan = scorer.plan(&f.window, 1, &f.fingerprints, &f.prefilter);
        let report = scorer.judge(&plan, &f.window, 1, &f.fingerprints, &LexicalStrategy);
        assert_eq!(report.score_of(0), Some(1.0));
        assert!(report.is_relevant(0));
    }

    #[test]
    fn prefilter_skips_old_disjoint_candidates_only() {
        let f = fixture(&[
            (Role::User, "quantum chromodynamics"),
            (Role::User, "baroque harpsichord"),
            (Role::User, "volcanic basalt"),
            (Role::User, "glacier moraine"),
            (Role::User, "louvre tickets"),
        ]);
        let scorer = RelevanceScorer::new(0.5, 2);
        let plan = scorer.plan(&f.window, 4, &f.fingerprints, &f.prefilter);
        // The two nearest candidates are always scored.
        assert!(plan.to_score.contains(&2));
        assert!(plan.to_score.contains(&3));
        assert_eq!(plan.to_score.len() + plan.skipped.len(), 4);
        assert_eq!(plan.embedding_targets()[0], 4);
    }

    #[test]
    fn leading_assistant_without_user_is_irrelevant() {
        let f = fixture(&[
            (Role::Assistant, "hello how can I help"),
            (Role::User, "louvre tickets"),
            (Role::User, "louvre tickets price"),
        ]);
        let scorer = RelevanceScorer::new(0.1, 2);
        let plan = scorer.plan(&f.window, 2, &f.fingerprints, &f.prefilter);
        let report = scorer.judge(&plan, &f.window, 2, &f.fingerprints, &LexicalStrategy);
        assert!(!report.is_relevant(0));
        assert!(report.is_relevant(1));
    }
}
