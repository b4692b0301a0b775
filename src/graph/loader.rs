//! JSON loading of the claim graph
//!
//! Decodes a `{nodes, edges}` document (the `nodesSource` / `edgesSource`
//! spellings are accepted too) and resolves every node's loosely-shaped
//! `info` into a [`NodeInfo`] once, so detectors never inspect raw JSON.
//!
//! Only unparseable JSON fails the load. Records that are not objects,
//! nodes without an id and edges without both endpoints are skipped with
//! a warning; a missing or non-string `type` becomes an empty kind.

use super::{ClaimEdge, ClaimGraph, ClaimNode, EdgeKind, NodeInfo, NodeKind, PersonInfo};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while loading a claim graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid graph document: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default, alias = "nodesSource")]
    nodes: Value,
    #[serde(default, alias = "edgesSource")]
    edges: Value,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Value,
    #[serde(rename = "type", default)]
    kind: Value,
    #[serde(default)]
    info: Value,
    /// Some exports keep enrollment dates beside `info` instead of inside it
    #[serde(default)]
    enter: Value,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(default)]
    from: Value,
    #[serde(default)]
    to: Value,
    #[serde(rename = "type", default)]
    kind: Value,
}

/// Load a claim graph from a JSON file
pub fn load_graph(path: &Path) -> Result<ClaimGraph, GraphError> {
    let content = std::fs::read_to_string(path).map_err(|source| GraphError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let graph = parse_graph(&content)?;
    info!(
        "Loaded {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

/// Parse a claim graph from a JSON string
pub fn parse_graph(json: &str) -> Result<ClaimGraph, GraphError> {
    let raw: RawDocument = serde_json::from_str(json)?;

    let (raw_nodes, mut skipped_nodes) = records::<RawNode>(raw.nodes, "nodes");
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for n in raw_nodes {
        if n.id.is_null() {
            skipped_nodes += 1;
            continue;
        }
        nodes.push(ClaimNode {
            id: scalar_text(&n.id),
            kind: NodeKind::from(kind_text(n.kind)),
            info: resolve_info(n.info, &n.enter),
        });
    }

    let (raw_edges, mut skipped_edges) = records::<RawEdge>(raw.edges, "edges");
    let mut edges = Vec::with_capacity(raw_edges.len());
    for e in raw_edges {
        if e.from.is_null() || e.to.is_null() {
            skipped_edges += 1;
            continue;
        }
        edges.push(ClaimEdge {
            from: scalar_text(&e.from),
            to: scalar_text(&e.to),
            kind: EdgeKind::from(kind_text(e.kind)),
        });
    }

    if skipped_nodes > 0 || skipped_edges > 0 {
        warn!(
            "Skipped {} malformed nodes and {} malformed edges",
            skipped_nodes, skipped_edges
        );
    }
    debug!("Decoded {} nodes, {} edges", nodes.len(), edges.len());
    Ok(ClaimGraph::new(nodes, edges))
}

/// Decode every object in a record list, counting the records that are not
/// objects or do not fit `T`
fn records<T: serde::de::DeserializeOwned>(list: Value, section: &str) -> (Vec<T>, usize) {
    let items = match list {
        Value::Array(items) => items,
        Value::Null => return (Vec::new(), 0),
        other => {
            warn!("Ignoring '{}': expected a list, found {}", section, other);
            return (Vec::new(), 0);
        }
    };
    let mut decoded = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        if !item.is_object() {
            skipped += 1;
            continue;
        }
        match serde_json::from_value(item) {
            Ok(record) => decoded.push(record),
            Err(e) => {
                debug!("Skipping {} record: {}", section, e);
                skipped += 1;
            }
        }
    }
    (decoded, skipped)
}

/// Node and edge types are strings; anything else is an unknown kind
fn kind_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        _ => String::new(),
    }
}

/// Ids and free-form infos may be strings or numbers
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn resolve_info(info: Value, outer_enter: &Value) -> NodeInfo {
    match info {
        Value::Object(map) => {
            let Some(name) = map.get("name").filter(|v| !v.is_null()) else {
                return NodeInfo::Missing;
            };
            let role = match map.get("role") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Array(items)) => Some(
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(","),
                ),
                _ => None,
            };
            let mut enter = date_strings(map.get("enter").unwrap_or(&Value::Null));
            enter.extend(date_strings(outer_enter));
            NodeInfo::Person(PersonInfo {
                name: scalar_text(name),
                role,
                enter,
            })
        }
        Value::Null => NodeInfo::Missing,
        Value::Array(_) => NodeInfo::Missing,
        scalar => NodeInfo::Label(scalar_text(&scalar)),
    }
}

fn date_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolves_info_variants() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    {"id": 1, "type": "Car", "info": "AB-123"},
                    {"id": "p1", "type": "Participant",
                     "info": {"name": "ANNA", "role": "Driver", "enter": ["2024-01-01"]}},
                    {"id": "a1", "type": "Accident", "info": {"date": "2024-01-01"}},
                    {"id": "x", "type": "Spaceship"}
                ],
                "edges": [{"from": 1, "to": "a1", "type": "involves"}]
            }"#,
        )
        .expect("parse graph");

        assert_eq!(graph.node("1").and_then(|n| n.plate()), Some("AB-123"));
        let anna = graph.node("p1").and_then(|n| n.person_info()).expect("person");
        assert_eq!(anna.role.as_deref(), Some("Driver"));
        assert_eq!(anna.enter, vec!["2024-01-01"]);
        assert_eq!(graph.node("a1").map(|n| &n.info), Some(&NodeInfo::Missing));
        assert_eq!(
            graph.node("x").map(|n| &n.kind),
            Some(&NodeKind::Other("Spaceship".into()))
        );
        assert_eq!(graph.edges()[0].from, "1");
    }

    #[test]
    fn test_parse_accepts_source_aliases_and_outer_enter() {
        let graph = parse_graph(
            r#"{
                "nodesSource": [
                    {"id": "p1", "type": "Participant",
                     "info": {"name": "BEN", "role": ["Driver", "Passenger"]},
                     "enter": ["2024-02-01", 7]}
                ],
                "edgesSource": []
            }"#,
        )
        .expect("parse graph");

        let ben = graph.node("p1").and_then(|n| n.person_info()).expect("person");
        assert_eq!(ben.role.as_deref(), Some("Driver,Passenger"));
        assert_eq!(ben.enter, vec!["2024-02-01"]);
    }

    #[test]
    fn test_parse_empty_document() {
        let graph = parse_graph("{}").expect("parse empty");
        assert!(graph.is_empty());
    }

    #[test]
    fn test_parse_keeps_untyped_nodes() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    {"id": "n1", "type": null},
                    {"id": "n2"},
                    {"id": "n3", "type": 5}
                ],
                "edges": [{"from": "n1", "to": "n2", "type": null}]
            }"#,
        )
        .expect("parse graph");

        assert_eq!(graph.node_count(), 3);
        assert_eq!(
            graph.node("n1").map(|n| &n.kind),
            Some(&NodeKind::Other(String::new()))
        );
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].kind, EdgeKind::from(String::new()));
    }

    #[test]
    fn test_parse_skips_malformed_records() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    {"id": "a1", "type": "Accident"},
                    "stray",
                    {"type": "Car", "info": "NO-ID"},
                    {"id": "c1", "type": "Car", "info": "AB-123"}
                ],
                "edges": [
                    {"from": "c1", "type": "involves"},
                    {"to": "a1", "type": "involves"},
                    42,
                    {"from": "c1", "to": "a1", "type": "involves"}
                ]
            }"#,
        )
        .expect("parse graph");

        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "c1"]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].to, "a1");
    }

    #[test]
    fn test_parse_ignores_non_list_sections() {
        let graph = parse_graph(r#"{"nodes": null, "edges": {"from": "x"}}"#).expect("parse");
        assert!(graph.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(parse_graph("{nodes: ["), Err(GraphError::Decode(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_graph(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GraphError::Read { .. }));
    }
}
