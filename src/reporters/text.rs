//! Text (terminal) reporter with colors and formatting

use crate::models::{FraudReport, Severity};
use anyhow::Result;

/// Severity colors
fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::High => "\x1b[91m",   // Light red
        Severity::Medium => "\x1b[33m", // Yellow
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const RULE_WIDTH: usize = 80;

fn section(out: &mut String, number: usize, title: &str) {
    out.push_str(&format!("{BOLD}{}. {}{RESET}\n", number, title));
    out.push_str(&format!("{DIM}{}{RESET}\n", "-".repeat(RULE_WIDTH)));
}

/// One `name: details [SEVERITY]` line
fn item(out: &mut String, name: &str, details: &str, severity: &Severity) {
    let sev_c = severity_color(severity);
    out.push_str(&format!(
        "  - {}: {} {sev_c}[{}]{RESET}\n",
        name, details, severity
    ));
}

/// Render report as formatted terminal output
pub fn render(report: &FraudReport) -> Result<String> {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let f = &report.findings;

    out.push_str(&format!("{heavy}\n{BOLD}INSURANCE FRAUD DETECTION REPORT{RESET}\n{heavy}\n"));
    out.push_str(&format!(
        "{DIM}Nodes: {}  Edges: {}{RESET}\n\n",
        report.summary.total_nodes, report.summary.total_edges
    ));

    section(
        &mut out,
        1,
        "STATISTICAL OUTLIER DETECTION (Participants in Multiple Accidents)",
    );
    let stats = &report.summary.outlier_statistics;
    out.push_str(&format!(
        "Statistics: Mean={:.2}, Threshold={:.2}, Max={}\n",
        stats.mean, stats.threshold, stats.max
    ));
    out.push_str(&format!(
        "Found {} suspicious participant(s):\n",
        f.statistical_outliers.len()
    ));
    for x in &f.statistical_outliers {
        item(&mut out, &x.name, &x.details, &x.severity);
    }
    out.push('\n');

    section(&mut out, 2, "TIME-BASED PATTERN DETECTION (Frequent Accidents)");
    out.push_str(&format!(
        "Found {} suspicious time pattern(s):\n",
        f.time_patterns.len()
    ));
    for x in &f.time_patterns {
        item(&mut out, &x.name, &x.details, &x.severity);
    }
    out.push('\n');

    section(
        &mut out,
        3,
        "REPEATED CAR DETECTION (Same Vehicle in Multiple Accidents)",
    );
    out.push_str(&format!("Found {} suspicious car(s):\n", f.repeated_cars.len()));
    for x in &f.repeated_cars {
        item(&mut out, &x.car, &x.details, &x.severity);
    }
    out.push('\n');

    section(&mut out, 4, "REPEATED WITNESS DETECTION");
    out.push_str(&format!(
        "Found {} suspicious witness(es):\n",
        f.repeated_witnesses.len()
    ));
    for x in &f.repeated_witnesses {
        item(&mut out, &x.name, &x.details, &x.severity);
    }
    out.push('\n');

    section(&mut out, 5, "ROLE SWITCHING DETECTION (Driver/Passenger Switch)");
    out.push_str(&format!(
        "Found {} suspicious role switcher(s):\n",
        f.role_switching.len()
    ));
    for x in &f.role_switching {
        item(&mut out, &x.name, &x.details, &x.severity);
    }
    out.push('\n');

    if !f.suspicious_professionals.is_empty() {
        section(&mut out, 6, "SUSPICIOUS PROFESSIONALS (Doctors/Lawyers)");
        out.push_str(&format!(
            "Found {} suspicious professional(s):\n",
            f.suspicious_professionals.len()
        ));
        for x in &f.suspicious_professionals {
            let label = format!("{} ({})", x.name, x.profession);
            item(&mut out, &label, &x.details, &x.severity);
        }
        out.push('\n');
    }

    // Summary
    out.push_str(&format!("{heavy}\n{BOLD}SUMMARY{RESET}\n{heavy}\n"));
    out.push_str(&format!(
        "Total unique suspicious entities: {}\n",
        report.summary.suspicious_entities
    ));
    out.push_str(&format!(
        "High-value leads: {}\n",
        report.summary.high_value_leads
    ));
    out.push_str(&format!(
        "Suspicious neighbourhood: {} nodes, {} edges\n",
        report.suspicious_subgraph.node_count, report.suspicious_subgraph.edge_count
    ));

    if report.leads.is_empty() {
        out.push_str(&format!("\n{DIM}No entity has multiple fraud indicators.{RESET}\n"));
    } else {
        out.push_str("\nMost suspicious entities (multiple fraud indicators):\n");
        for lead in &report.leads {
            let labels: Vec<&str> = lead.indicators.iter().map(|l| l.as_str()).collect();
            out.push_str(&format!(
                "  - {BOLD}{}{RESET}: {} indicators - {}\n",
                lead.name,
                lead.indicator_count,
                labels.join(", ")
            ));
        }
    }
    out.push('\n');

    Ok(out)
}
