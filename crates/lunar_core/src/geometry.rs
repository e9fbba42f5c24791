//! Persistent (bold) edges derived from completed lunar cycles.

use crate::types::NodeId;
use derive_more::Display;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// An edge with no direction: `(a, b)` equals `(b, a)`.
///
/// Endpoints are stored in sorted order so derived equality, ordering and
/// hashing are all direction-independent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{}-{}", low, high)]
pub struct UndirectedEdge {
    low: NodeId,
    high: NodeId,
}

impl UndirectedEdge {
    /// Creates an edge between two nodes in either order.
    pub fn new(a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Endpoints in canonical order.
    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        (&self.low, &self.high)
    }

    /// Returns true if the edge touches the node.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.low == node || &self.high == node
    }

    fn is_loop(&self) -> bool {
        self.low == self.high
    }
}

/// Consecutive node pairs of a chain as undirected edges. Self-loops are skipped.
pub fn chain_edges(chain: &[NodeId]) -> impl Iterator<Item = UndirectedEdge> + '_ {
    chain
        .windows(2)
        .map(|w| UndirectedEdge::new(w[0].clone(), w[1].clone()))
        .filter(|edge| !edge.is_loop())
}

/// A de-duplicated set of undirected edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet(BTreeSet<UndirectedEdge>);

impl EdgeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an edge; returns false if it was already present.
    pub fn insert(&mut self, edge: UndirectedEdge) -> bool {
        self.0.insert(edge)
    }

    /// Appends the edges of one chain; returns how many were new.
    pub fn extend_chain(&mut self, chain: &[NodeId]) -> usize {
        let mut added = 0;
        for edge in chain_edges(chain) {
            if self.0.insert(edge) {
                added += 1;
            }
        }
        added
    }

    /// Returns true if the set holds the edge between `a` and `b` (either direction).
    pub fn contains(&self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> bool {
        self.0.contains(&UndirectedEdge::new(a, b))
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes every edge.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates edges in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &UndirectedEdge> {
        self.0.iter()
    }
}

impl FromIterator<UndirectedEdge> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = UndirectedEdge>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Rebuilds the persistent edge set from every confirmed lunar cycle.
///
/// Pure and idempotent: the result depends only on the set of consecutive
/// pairs, not on chain order or traversal direction.
#[instrument(skip(lunar_cycles), fields(cycles = lunar_cycles.len()))]
pub fn build_persistent_edges<C: AsRef<[NodeId]>>(lunar_cycles: &[C]) -> EdgeSet {
    let edges: EdgeSet = lunar_cycles
        .iter()
        .flat_map(|chain| chain_edges(chain.as_ref()))
        .collect();
    debug!(edges = edges.len(), "Built persistent edges");
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| NodeId::from(*n)).collect()
    }

    #[test]
    fn test_edge_equality_ignores_direction() {
        assert_eq!(UndirectedEdge::new("a", "b"), UndirectedEdge::new("b", "a"));
        assert_eq!(UndirectedEdge::new("b", "a").to_string(), "a-b");
    }

    #[test]
    fn test_flattens_consecutive_pairs() {
        let edges = build_persistent_edges(&[chain(&["a", "b", "c", "d"])]);
        assert_eq!(edges.len(), 3);
        assert!(edges.contains("a", "b"));
        assert!(edges.contains("c", "b"));
        assert!(edges.contains("c", "d"));
        assert!(!edges.contains("a", "d"));
    }

    #[test]
    fn test_idempotent_and_direction_independent() {
        let forward = vec![chain(&["a", "b", "c"]), chain(&["c", "d"])];
        let backward = vec![chain(&["d", "c"]), chain(&["c", "b", "a"])];
        let first = build_persistent_edges(&forward);
        let second = build_persistent_edges(&forward);
        assert_eq!(first, second);
        assert_eq!(first, build_persistent_edges(&backward));
    }

    #[test]
    fn test_overlapping_chains_are_deduplicated() {
        let edges = build_persistent_edges(&[chain(&["a", "b", "c"]), chain(&["b", "a"])]);
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_extend_chain_reports_new_edges() {
        let mut edges = build_persistent_edges(&[chain(&["a", "b"])]);
        assert_eq!(edges.extend_chain(&chain(&["b", "a", "c"])), 1);
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_degenerate_chains() {
        let empty: Vec<Vec<NodeId>> = Vec::new();
        assert!(build_persistent_edges(&empty).is_empty());
        assert!(build_persistent_edges(&[chain(&["a"])]).is_empty());
        assert!(build_persistent_edges(&[chain(&["a", "a"])]).is_empty());
    }
}
