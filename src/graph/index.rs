//! Lookup indexes derived from the claim graph
//!
//! Built in a single pass over the nodes, using the graph's pre-grouped
//! adjacency instead of rescanning the edge list per node. Maps keep
//! first-appearance order so everything downstream is deterministic.

use super::{ClaimGraph, ClaimNode, EdgeKind, NodeKind};
use indexmap::IndexMap;
use tracing::debug;

/// Query-friendly views over one graph snapshot
#[derive(Debug, Clone, Default)]
pub struct GraphIndex<'g> {
    /// person name -> every node carrying that name (any person-bearing type)
    pub person_to_nodes: IndexMap<&'g str, Vec<&'g ClaimNode>>,
    /// license plate -> accident ids reached via `involves` edges
    pub car_to_accidents: IndexMap<&'g str, Vec<&'g str>>,
    /// witness name -> accident ids reached via `witnesses` edges
    pub witness_to_accidents: IndexMap<&'g str, Vec<&'g str>>,
    /// accident id -> ids of participants connected to it by any edge
    pub accident_participants: IndexMap<&'g str, Vec<&'g str>>,
}

impl<'g> GraphIndex<'g> {
    pub fn build(graph: &'g ClaimGraph) -> Self {
        let mut index = GraphIndex::default();

        for node in graph.nodes() {
            if let Some(name) = node.name() {
                index.person_to_nodes.entry(name).or_default().push(node);
            }

            match node.kind {
                NodeKind::Car => {
                    if let Some(plate) = node.plate() {
                        let accidents = index.car_to_accidents.entry(plate).or_default();
                        accidents.extend(
                            graph
                                .edges_from(&node.id)
                                .filter(|e| e.kind == EdgeKind::Involves)
                                .map(|e| e.to.as_str()),
                        );
                    }
                }
                NodeKind::Witness => {
                    if let Some(name) = node.name() {
                        let accidents = index.witness_to_accidents.entry(name).or_default();
                        accidents.extend(
                            graph
                                .edges_from(&node.id)
                                .filter(|e| e.kind == EdgeKind::Witnesses)
                                .map(|e| e.to.as_str()),
                        );
                    }
                }
                NodeKind::Accident => {
                    let participants = index
                        .accident_participants
                        .entry(node.id.as_str())
                        .or_default();
                    let neighbours = graph
                        .edges_from(&node.id)
                        .map(|e| e.to.as_str())
                        .chain(graph.edges_to(&node.id).map(|e| e.from.as_str()));
                    for other in neighbours {
                        let is_participant = graph
                            .node(other)
                            .is_some_and(|n| n.kind == NodeKind::Participant);
                        if is_participant && !participants.contains(&other) {
                            participants.push(other);
                        }
                    }
                }
                _ => {}
            }
        }

        debug!(
            "Indexed {} people, {} cars, {} witnesses, {} accidents",
            index.person_to_nodes.len(),
            index.car_to_accidents.len(),
            index.witness_to_accidents.len(),
            index.accident_participants.len()
        );
        index
    }
}
