//! Entity command - flags and connections of one person

use super::Cli;
use crate::graph::{ClaimGraph, ClaimNode, Connection, RelationGraph};
use crate::pipeline::Pipeline;

use anyhow::{bail, Result};
use console::style;
use petgraph::Direction;

/// Nodes for `query`: exact name matches if any, else substring matches
pub(crate) fn resolve_entity<'g>(graph: &'g ClaimGraph, query: &str) -> Vec<&'g ClaimNode> {
    let needle = query.to_lowercase();
    let exact: Vec<&ClaimNode> = graph
        .nodes()
        .iter()
        .filter(|n| n.name().is_some_and(|name| name.to_lowercase() == needle))
        .collect();
    if !exact.is_empty() {
        return exact;
    }
    graph
        .nodes()
        .iter()
        .filter(|n| {
            n.name()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

fn print_connections(title: &str, connections: &[Connection<'_>], limit: usize) {
    if connections.is_empty() {
        return;
    }
    println!("    {}:", style(title).dim());
    for c in connections.iter().take(limit) {
        let label = c.other.label();
        println!(
            "      {:<13} {} {} {}",
            c.edge.kind.as_str(),
            c.other.kind.as_str(),
            style(&c.other.id).dim(),
            if label.is_empty() { "" } else { label }
        );
    }
    if connections.len() > limit {
        println!(
            "      {}",
            style(format!("... and {} more", connections.len() - limit)).dim()
        );
    }
}

/// Run the entity command
pub fn run(cli: &Cli, query: &str, limit: usize) -> Result<()> {
    let session = cli.open_session()?;
    let graph = &session.graph;

    let nodes = resolve_entity(graph, query);
    if nodes.is_empty() {
        bail!("No person named '{}' in {}", query, session.input.display());
    }

    let report = Pipeline::new(session.config.clone()).run(graph)?;
    let relations = RelationGraph::build(graph);

    let mut shown_names: Vec<&str> = Vec::new();
    for node in &nodes {
        let name = node.name().unwrap_or_default();
        if !shown_names.contains(&name) {
            shown_names.push(name);
            println!("\n{}", style(name).bold());
            match report.fraud_flags.get(name) {
                Some(labels) => {
                    let labels: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
                    println!(
                        "  {} {}",
                        style("⚠ flags:").red(),
                        style(labels.join(", ")).red().bold()
                    );
                }
                None => println!("  {}", style("no fraud flags").green()),
            }
        }

        let info = node.person_info();
        let roles: Vec<&str> = info.map(|p| p.roles().collect()).unwrap_or_default();
        println!(
            "  {} {}{}",
            node.kind,
            style(&node.id).dim(),
            if roles.is_empty() {
                String::new()
            } else {
                format!(" ({})", roles.join(", "))
            }
        );
        if let Some(dates) = info.map(|p| &p.enter).filter(|d| !d.is_empty()) {
            println!("    {} {}", style("dates:").dim(), dates.join(", "));
        }

        print_connections(
            "outgoing",
            &relations.connections(&node.id, Direction::Outgoing),
            limit,
        );
        print_connections(
            "incoming",
            &relations.connections(&node.id, Direction::Incoming),
            limit,
        );
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ClaimGraph {
        ClaimGraph::new(
            vec![
                ClaimNode::participant("p1", "ANNA LEE"),
                ClaimNode::participant("p2", "ANNA"),
                ClaimNode::witness("w1", "ANNA"),
                ClaimNode::car("c1", "ANNA-1"),
            ],
            vec![],
        )
    }

    #[test]
    fn test_exact_name_wins() {
        let g = graph();
        let ids: Vec<&str> = resolve_entity(&g, "anna").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "w1"]);
    }

    #[test]
    fn test_substring_fallback_skips_non_persons() {
        let g = graph();
        let ids: Vec<&str> = resolve_entity(&g, "lee").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["p1"]);
        assert!(resolve_entity(&g, "ANNA-1").is_empty());
    }
}
