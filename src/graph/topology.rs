//! Relationship graph over resolved edges
//!
//! A petgraph view of the snapshot used for neighbourhood queries: the
//! subgraph around flagged entities and per-node connection listings.
//! Edges whose endpoints are not in the node set are left out.

use super::{ClaimEdge, ClaimGraph, ClaimNode};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

/// Induced subgraph around a set of seed nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighborhood {
    /// Node ids in the subgraph, in node-set order
    pub node_ids: Vec<String>,
    pub edge_count: usize,
}

/// One resolved connection of a node
#[derive(Debug, Clone, Copy)]
pub struct Connection<'g> {
    pub edge: &'g ClaimEdge,
    pub other: &'g ClaimNode,
}

pub struct RelationGraph<'g> {
    graph: DiGraph<&'g ClaimNode, &'g ClaimEdge>,
    index_of: FxHashMap<&'g str, NodeIndex>,
}

impl<'g> RelationGraph<'g> {
    pub fn build(claims: &'g ClaimGraph) -> Self {
        let mut graph = DiGraph::with_capacity(claims.node_count(), claims.edge_count());
        let mut index_of = FxHashMap::default();

        for node in claims.nodes() {
            let idx = graph.add_node(node);
            index_of.insert(node.id.as_str(), idx);
        }

        for edge in claims.edges() {
            if let (Some(&from), Some(&to)) =
                (index_of.get(edge.from.as_str()), index_of.get(edge.to.as_str()))
            {
                graph.add_edge(from, to, edge);
            }
        }

        Self { graph, index_of }
    }

    /// Resolved edges (dangling ones excluded)
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Seeds plus all of their predecessors and successors
    ///
    /// Edges are counted once per ordered (source, target) pair, so parallel
    /// records between the same two nodes count as one.
    pub fn neighborhood<'a>(&self, seeds: impl IntoIterator<Item = &'a str>) -> Neighborhood {
        let mut members: FxHashSet<NodeIndex> = FxHashSet::default();
        for seed in seeds {
            let Some(&idx) = self.index_of.get(seed) else {
                continue;
            };
            members.insert(idx);
            members.extend(self.graph.neighbors_directed(idx, Direction::Outgoing));
            members.extend(self.graph.neighbors_directed(idx, Direction::Incoming));
        }

        let edge_count = self
            .graph
            .edge_references()
            .filter(|e| members.contains(&e.source()) && members.contains(&e.target()))
            .map(|e| (e.source(), e.target()))
            .collect::<FxHashSet<_>>()
            .len();

        let mut ordered: Vec<NodeIndex> = members.into_iter().collect();
        ordered.sort_unstable();

        Neighborhood {
            node_ids: ordered
                .into_iter()
                .map(|idx| self.graph[idx].id.clone())
                .collect(),
            edge_count,
        }
    }

    /// Resolved connections of a node in one direction, in input order
    pub fn connections(&self, id: &str, direction: Direction) -> Vec<Connection<'g>> {
        let Some(&idx) = self.index_of.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<(petgraph::graph::EdgeIndex, Connection<'g>)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (
                    e.id(),
                    Connection {
                        edge: *e.weight(),
                        other: self.graph[other],
                    },
                )
            })
            .collect();
        // petgraph walks adjacency newest-first
        out.sort_by_key(|(edge_idx, _)| *edge_idx);
        out.into_iter().map(|(_, c)| c).collect()
    }
}
