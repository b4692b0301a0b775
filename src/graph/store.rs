//! In-memory claim graph
//!
//! Holds the immutable node and edge sequences of one snapshot plus
//! id-keyed lookups. Edges are grouped by source and by target once at
//! construction, so every per-node edge scan downstream is a direct lookup.

use super::{ClaimEdge, ClaimNode};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Immutable node/edge snapshot with adjacency lookups
#[derive(Debug, Clone, Default)]
pub struct ClaimGraph {
    nodes: Vec<ClaimNode>,
    edges: Vec<ClaimEdge>,
    /// node id -> position in `nodes` (last record wins on duplicate ids)
    by_id: FxHashMap<String, usize>,
    /// source id -> positions in `edges`
    outgoing: FxHashMap<String, Vec<usize>>,
    /// target id -> positions in `edges`
    incoming: FxHashMap<String, Vec<usize>>,
}

impl ClaimGraph {
    pub fn new(nodes: Vec<ClaimNode>, edges: Vec<ClaimEdge>) -> Self {
        let mut by_id = FxHashMap::default();
        for (pos, node) in nodes.iter().enumerate() {
            if by_id.insert(node.id.clone(), pos).is_some() {
                warn!("Duplicate node id {:?}; lookups resolve to the last record", node.id);
            }
        }

        let mut outgoing: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut incoming: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut dangling = 0usize;
        for (pos, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.from.clone()).or_default().push(pos);
            incoming.entry(edge.to.clone()).or_default().push(pos);
            if !by_id.contains_key(&edge.from) || !by_id.contains_key(&edge.to) {
                dangling += 1;
            }
        }
        if dangling > 0 {
            debug!("{} edges reference node ids absent from the node set", dangling);
        }

        Self {
            nodes,
            edges,
            by_id,
            outgoing,
            incoming,
        }
    }

    pub fn nodes(&self) -> &[ClaimNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[ClaimEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Look up a node by id; a miss is simply `None`
    pub fn node(&self, id: &str) -> Option<&ClaimNode> {
        self.by_id.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Edges whose `from` is `id`, in input order
    pub fn edges_from<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a ClaimEdge> + 'a {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.edges[pos])
    }

    /// Edges whose `to` is `id`, in input order
    pub fn edges_to<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a ClaimEdge> + 'a {
        self.incoming
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.edges[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;

    fn sample() -> ClaimGraph {
        ClaimGraph::new(
            vec![
                ClaimNode::accident("a1"),
                ClaimNode::car("c1", "AB-123"),
                ClaimNode::participant("p1", "ANNA"),
            ],
            vec![
                ClaimEdge::new("c1", "a1", EdgeKind::Involves),
                ClaimEdge::new("p1", "c1", EdgeKind::Drives),
                ClaimEdge::new("c1", "ghost", EdgeKind::Involves),
            ],
        )
    }

    #[test]
    fn test_adjacency_lookups() {
        let graph = sample();
        let out: Vec<&str> = graph.edges_from("c1").map(|e| e.to.as_str()).collect();
        assert_eq!(out, vec!["a1", "ghost"]);
        let inc: Vec<&str> = graph.edges_to("c1").map(|e| e.from.as_str()).collect();
        assert_eq!(inc, vec!["p1"]);
        assert_eq!(graph.edges_from("nobody").count(), 0);
    }

    #[test]
    fn test_missing_node_is_none() {
        let graph = sample();
        assert!(graph.node("ghost").is_none());
        assert_eq!(graph.node("p1").and_then(|n| n.name()), Some("ANNA"));
    }

    #[test]
    fn test_duplicate_id_resolves_to_last() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::participant("p1", "FIRST"),
                ClaimNode::participant("p1", "SECOND"),
            ],
            vec![],
        );
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node("p1").and_then(|n| n.name()), Some("SECOND"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = ClaimGraph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
    }
}
