//! What a compressed unit must keep.

use std::collections::BTreeMap;
use std::ops::Range;

use mmos_core::errors::CompressionError;
use mmos_core::models::{Fingerprint, Turn};
use mmos_tokens::{find_markers, TokenizedText, Tokenizer};

use crate::spans::{glued, is_digit, SpanSet};

/// Preserved spans of one turn and the literal items they cover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreservedSet {
    pub spans: SpanSet,
    /// Distinct preserved substrings, in order of appearance.
    pub items: Vec<String>,
    /// Whether any number or entity (not just a marker) is preserved.
    pub has_answer_entities: bool,
}

impl PreservedSet {
    fn push(&mut self, text: &str, range: Range<usize>) {
        let item = text[range.clone()].to_string();
        if !self.items.contains(&item) {
            self.items.push(item);
        }
        self.spans.insert(range);
    }
}

/// A turn prepared for compression.
#[derive(Debug, Clone)]
pub struct TurnAnalysis {
    pub turn: Turn,
    pub tokenized: TokenizedText,
    pub preserved: PreservedSet,
    /// Term weights from the turn's fingerprint.
    pub weights: BTreeMap<String, f64>,
}

impl TurnAnalysis {
    /// Numbers, entity-set terms, and every negation or interrogative
    /// marker are preserved. Empty turns analyze to nothing.
    pub fn analyze(tokenizer: &Tokenizer, turn: &Turn, fingerprint: Option<&Fingerprint>) -> Self {
        let text = turn.content();
        let tokenized = tokenizer.tokenize(text).unwrap_or_default();
        let mut preserved = PreservedSet::default();

        let mut ranges: Vec<(Range<usize>, bool)> = Vec::new();
        for token in tokenized.tokens() {
            let entity = fingerprint
                .map(|f| f.entity_set.contains(&token.term))
                .unwrap_or(false);
            if token.is_number() || entity {
                ranges.push((token.span.clone(), true));
            }
        }
        for marker in find_markers(text) {
            ranges.push((marker.span, false));
        }
        ranges.sort_by_key(|(r, _)| (r.start, r.end));

        for (range, is_entity) in ranges {
            preserved.has_answer_entities |= is_entity;
            preserved.push(text, range);
        }

        Self {
            turn: turn.clone(),
            tokenized,
            preserved,
            weights: fingerprint
                .map(|f| f.term_weights.clone())
                .unwrap_or_default(),
        }
    }

    pub fn sequence_index(&self) -> u64 {
        self.turn.sequence_index()
    }

    pub fn text(&self) -> &str {
        self.turn.content()
    }

    /// Fingerprint weight of a term, 1 when unknown.
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(1.0)
    }
}

/// Whether `item` occurs in `text` as a unit of its own. An occurrence
/// glued to a surrounding digit or letter run does not count: `9` is not
/// found in `1793`, nor `not` in `cannot`.
pub fn contains_item(text: &str, item: &str) -> bool {
    let (Some(first), Some(last)) = (item.chars().next(), item.chars().next_back()) else {
        return true;
    };
    text.match_indices(item).any(|(start, _)| {
        let end = start + item.len();
        !extends(first, text[..start].chars().rev()) && !extends(last, text[end..].chars())
    })
}

/// Whether the run ending at `edge` continues into `outside`. A number
/// also continues across a `.` or `,` followed by another digit.
fn extends(edge: char, mut outside: impl Iterator<Item = char>) -> bool {
    let Some(next) = outside.next() else {
        return false;
    };
    if glued(edge, next) {
        return true;
    }
    is_digit(edge) && matches!(next, '.' | ',') && outside.next().is_some_and(is_digit)
}

/// Every preserved item of every turn must occur in `compressed` as a unit
/// of its own (see [`contains_item`]).
pub fn verify(compressed: &str, turns: &[TurnAnalysis]) -> Result<(), CompressionError> {
    for analysis in turns {
        for item in &analysis.preserved.items {
            if !contains_item(compressed, item) {
                return Err(CompressionError::PreservationViolated {
                    sequence_index: analysis.sequence_index(),
                    item: item.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Preserved items across turns, deduplicated in order.
pub fn collect_items(turns: &[TurnAnalysis]) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for analysis in turns {
        for item in &analysis.preserved.items {
            if !items.contains(item) {
                items.push(item.clone());
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn fingerprint(entities: &[&str]) -> Fingerprint {
        let mut f = Fingerprint::empty(0, "h");
        f.entity_set = entities.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        f
    }

    #[test]
    fn numbers_entities_and_markers_are_preserved() {
        let tokenizer = Tokenizer::default();
        let turn = Turn::user("Why does the Louvre not open before 9?", 0);
        let analysis = TurnAnalysis::analyze(&tokenizer, &turn, Some(&fingerprint(&["louvre"])));
        assert_eq!(
            analysis.preserved.items,
            vec!["Why", "Louvre", "not", "9", "?"]
        );
        assert!(analysis.preserved.has_answer_entities);
    }

    #[test]
    fn markers_alone_are_not_answer_entities() {
        let tokenizer = Tokenizer::default();
        let turn = Turn::assistant("不清楚", 1);
        let analysis = TurnAnalysis::analyze(&tokenizer, &turn, None);
        assert_eq!(analysis.preserved.items, vec!["不"]);
        assert!(!analysis.preserved.has_answer_entities);
    }

    #[test]
    fn verify_reports_first_missing_item() {
        let tokenizer = Tokenizer::default();
        let turn = Turn::assistant("It costs 17 euros", 4);
        let analysis = TurnAnalysis::analyze(&tokenizer, &turn, None);
        assert!(verify("costs 17", &[analysis.clone()]).is_ok());
        assert_eq!(
            verify("costs", &[analysis]),
            Err(CompressionError::PreservationViolated {
                sequence_index: 4,
                item: "17".into()
            })
        );
    }

    #[test]
    fn items_only_match_as_whole_runs() {
        assert!(contains_item("opened in 1793 | 9", "9"));
        assert!(!contains_item("opened in 1793", "9"));
        assert!(!contains_item("it cannot be", "not"));
        assert!(!contains_item("costs 17.50", "17"));
        assert!(contains_item("costs 17. Then", "17"));
        assert!(contains_item("卢浮宫17欧元", "卢浮宫"));
        assert!(contains_item("Doors open at 9?", "?"));
    }

    #[test]
    fn verify_rejects_number_hidden_in_another() {
        let tokenizer = Tokenizer::default();
        let turn = Turn::assistant("The museum opened in 1793. Doors open at 9 sharp.", 2);
        let analysis = TurnAnalysis::analyze(&tokenizer, &turn, None);
        assert_eq!(analysis.preserved.items, vec!["1793", "9"]);
        assert_eq!(
            verify("The museum opened in 1793.", &[analysis.clone()]),
            Err(CompressionError::PreservationViolated {
                sequence_index: 2,
                item: "9".into()
            })
        );
        assert!(verify("opened in 1793. at 9", &[analysis]).is_ok());
    }

    #[test]
    fn empty_turn_preserves_nothing() {
        let analysis = TurnAnalysis::analyze(&Tokenizer::default(), &Turn::user("  ", 0), None);
        assert!(analysis.preserved.items.is_empty());
        assert!(analysis.tokenized.is_empty());
    }
}
