//! Serving-side lookup helpers.
//!
//! The serving layer exposes the stored tables verbatim and, for a small
//! user selection of topics, needs to answer "is there a direct edge
//! between these two, in either orientation?". These helpers back that
//! contract without pulling HTTP concerns into the core.

use std::collections::HashMap;

use wikigraph_types::Edge;

/// Keep only edges whose similarity is strictly above `threshold`.
///
/// Applied at load time before re-running preprocessing on the stored edge
/// set.
pub fn filter_edges_by_threshold(edges: &[Edge], threshold: f64) -> Vec<Edge> {
    edges
        .iter()
        .filter(|e| e.similarity > threshold)
        .cloned()
        .collect()
}

/// Orientation-insensitive direct-edge lookup over an edge set.
///
/// Built once per loaded graph; lookups are O(1) per topic pair, so probing
/// all pairs of a selection of tens of topics stays cheap.
pub struct ConnectionIndex {
    edges: Vec<Edge>,
    by_pair: HashMap<(String, String), usize>,
}

impl ConnectionIndex {
    pub fn build(edges: &[Edge]) -> Self {
        let mut by_pair = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            let key = pair_key(&edge.source, &edge.target);
            // First-seen edge wins for a pair, matching preprocessing.
            by_pair.entry(key).or_insert(i);
        }
        Self {
            edges: edges.to_vec(),
            by_pair,
        }
    }

    /// Find the direct edge between two topics in either orientation, or
    /// `None` when no direct connection exists.
    pub fn direct_connection(&self, a: &str, b: &str) -> Option<&Edge> {
        self.by_pair
            .get(&pair_key(a, b))
            .map(|&i| &self.edges[i])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
