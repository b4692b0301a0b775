//! Claim graph for fraud analysis
//!
//! Typed nodes and directed edges of one immutable snapshot, the lookup
//! indexes derived from it, and a petgraph view for neighbourhood queries.

pub mod index;
pub mod loader;
pub mod store;
pub mod store_models;
pub mod topology;

pub use index::GraphIndex;
pub use loader::{load_graph, parse_graph, GraphError};
pub use store::ClaimGraph;
pub use store_models::{ClaimEdge, ClaimNode, EdgeKind, NodeInfo, NodeKind, PersonInfo};
pub use topology::{Connection, Neighborhood, RelationGraph};
