//! Undirected keyword co-occurrence graph.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{NodeIndex, UnGraph};

/// Keywords as nodes, co-occurrence counts as edge weights.
#[derive(Debug, Clone, Default)]
pub struct KeywordGraph {
    graph: UnGraph<String, f64>,
    nodes: BTreeMap<String, NodeIndex>,
}

impl KeywordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link every pair of distinct keywords appearing in turns fewer than
    /// `window` positions apart. Within one turn a keyword pair adds 1. Two
    /// different turns add 1 per ordered placement, so `x` and `y` in both
    /// add 2 (x before y, y before x). Term frequencies inside a turn never
    /// add weight.
    pub fn from_turns(turn_terms: &[Vec<String>], window: usize) -> Self {
        let mut graph = Self::new();
        graph.add_turns(turn_terms, window);
        graph
    }

    /// Add one contiguous run of turns. Co-occurrence never crosses runs.
    pub fn add_turns(&mut self, turn_terms: &[Vec<String>], window: usize) {
        let window = window.max(1);
        let distinct: Vec<BTreeSet<&str>> = turn_terms
            .iter()
            .map(|terms| terms.iter().map(String::as_str).collect())
            .collect();

        for terms in &distinct {
            for term in terms {
                self.node(term);
            }
        }

        for i in 0..distinct.len() {
            let end = (i + window).min(distinct.len());
            for j in i..end {
                for a in &distinct[i] {
                    for b in &distinct[j] {
                        // Within one turn each unordered pair once.
                        if a == b || (i == j && a > b) {
                            continue;
                        }
                        self.add_weight(a, b, 1.0);
                    }
                }
            }
        }
    }

    fn node(&mut self, term: &str) -> NodeIndex {
        if let Some(idx) = self.nodes.get(term) {
            return *idx;
        }
        let idx = self.graph.add_node(term.to_string());
        self.nodes.insert(term.to_string(), idx);
        idx
    }

    pub fn add_weight(&mut self, a: &str, b: &str, weight: f64) {
        let ia = self.node(a);
        let ib = self.node(b);
        match self.graph.find_edge(ia, ib) {
            Some(edge) => self.graph[edge] += weight,
            None => {
                self.graph.add_edge(ia, ib, weight);
            }
        }
    }

    /// Edge weight between two keywords, 0 when unlinked.
    pub fn weight(&self, a: &str, b: &str) -> f64 {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(ia), Some(ib)) => self
                .graph
                .find_edge(*ia, *ib)
                .map(|e| self.graph[e])
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn inner(&self) -> &UnGraph<String, f64> {
        &self.graph
    }
}
