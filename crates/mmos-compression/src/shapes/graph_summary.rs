//! Multi-turn summary: the sentences richest in central keywords.

use std::collections::{BTreeMap, BTreeSet};

use crate::preservation::{collect_items, contains_item, TurnAnalysis};

/// `[label] <top sentences in original order>`, then ` | ` and any preserved
/// items the chosen sentences do not already contain.
pub fn summarize(
    label: &str,
    turns: &[TurnAnalysis],
    keyword_ranks: &BTreeMap<String, f64>,
    max_sentences: usize,
) -> String {
    // (turn position, sentence position, score, text)
    let mut sentences: Vec<(usize, usize, f64, &str)> = Vec::new();
    for (ti, analysis) in turns.iter().enumerate() {
        for (si, sentence) in analysis.tokenized.sentences.iter().enumerate() {
            let terms: BTreeSet<&str> = sentence.tokens.iter().map(|t| t.term.as_str()).collect();
            let score: f64 = terms
                .iter()
                .map(|t| keyword_ranks.get(*t).copied().unwrap_or(0.0))
                .sum();
            sentences.push((ti, si, score, &analysis.text()[sentence.span.clone()]));
        }
    }

    let mut ranked: Vec<usize> = (0..sentences.len()).collect();
    ranked.sort_by(|&a, &b| {
        sentences[b]
            .2
            .partial_cmp(&sentences[a].2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    let mut chosen: Vec<usize> = ranked.into_iter().take(max_sentences).collect();
    chosen.sort_unstable();

    let body = chosen
        .iter()
        .map(|&i| sentences[i].3)
        .collect::<Vec<_>>()
        .join(" ");

    let missing: Vec<String> = collect_items(turns)
        .into_iter()
        .filter(|item| !contains_item(&body, item))
        .collect();

    let mut out = format!("[{label}] {body}");
    if !missing.is_empty() {
        out.push_str(" | ");
        out.push_str(&missing.join(" "));
    }
    out
}
