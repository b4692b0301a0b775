//! Search command - find entities by name, label or id

use super::Cli;
use crate::graph::ClaimNode;
use crate::pipeline::Pipeline;

use anyhow::Result;
use console::style;

/// Nodes whose label or id contains `term`, case-insensitively, in input order
pub(crate) fn matching_nodes<'g>(nodes: &'g [ClaimNode], term: &str) -> Vec<&'g ClaimNode> {
    let needle = term.to_lowercase();
    nodes
        .iter()
        .filter(|n| {
            n.label().to_lowercase().contains(&needle) || n.id.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Run the search command
pub fn run(cli: &Cli, term: &str, limit: usize) -> Result<()> {
    let session = cli.open_session()?;
    let report = Pipeline::new(session.config).run(&session.graph)?;

    let hits = matching_nodes(session.graph.nodes(), term);
    if hits.is_empty() {
        println!("No entities match '{}'", style(term).cyan());
        return Ok(());
    }

    println!(
        "\n{} {} match(es) for '{}'\n",
        style("🔍").bold(),
        hits.len(),
        style(term).cyan()
    );

    for node in hits.iter().take(limit) {
        let label = node.label();
        let flags = report.fraud_flags.get(label).filter(|_| node.name().is_some());
        let marker = match flags {
            Some(labels) => style(format!(
                "[{}]",
                labels.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(", ")
            ))
            .red()
            .to_string(),
            None => String::new(),
        };
        println!(
            "  {:<12} {:<10} {} {}",
            style(&node.id).dim(),
            node.kind.as_str(),
            style(if label.is_empty() { "-" } else { label }).bold(),
            marker
        );
    }

    if hits.len() > limit {
        println!(
            "\n  {}",
            style(format!("... and {} more (use --limit)", hits.len() - limit)).dim()
        );
    }
    println!();

    Ok(())
}
