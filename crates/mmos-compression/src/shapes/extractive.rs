//! Extractive single-turn compression.
//!
//! Keeps every preserved span plus the heaviest `keep_ratio` share of the
//! remaining content tokens, in original order. Assistant turns favour
//! tokens next to numbers, so a figure keeps its unit or subject.

use mmos_core::models::{Role, Token};

use crate::preservation::TurnAnalysis;
use crate::spans::SpanSet;

/// Compress one turn. Turns without content tokens come back trimmed.
pub fn extract(analysis: &TurnAnalysis, keep_ratio: f64) -> String {
    let tokens: Vec<&Token> = analysis.tokenized.tokens().collect();
    let preserved = &analysis.preserved.spans;

    let near_number: Vec<bool> = (0..tokens.len())
        .map(|i| {
            analysis.turn.role() == Role::Assistant
                && ((i > 0 && tokens[i - 1].is_number())
                    || (i + 1 < tokens.len() && tokens[i + 1].is_number()))
        })
        .collect();

    let mut candidates: Vec<usize> = (0..tokens.len())
        .filter(|&i| !is_covered(preserved, &tokens[i].span))
        .collect();
    let keep = (keep_ratio * candidates.len() as f64).ceil() as usize;

    candidates.sort_by(|&a, &b| {
        near_number[b]
            .cmp(&near_number[a])
            .then_with(|| {
                analysis
                    .weight(&tokens[b].term)
                    .partial_cmp(&analysis.weight(&tokens[a].term))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.cmp(&b))
    });

    let mut kept = preserved.clone();
    for &i in candidates.iter().take(keep) {
        kept.insert(tokens[i].span.clone());
    }

    if kept.is_empty() {
        return analysis.text().trim().to_string();
    }
    kept.render(analysis.text())
}

fn is_covered(set: &SpanSet, span: &std::ops::Range<usize>) -> bool {
    set.spans()
        .iter()
        .any(|s| s.start <= span.start && span.end <= s.end)
}
