//! Fraud analysis pipeline
//!
//! Orchestrates one analysis run over a loaded claim graph:
//! 1. Build the lookup indexes
//! 2. Run the configured detectors
//! 3. Rank flagged entities into leads
//! 4. Measure the neighbourhood around flagged entities
//! 5. Assemble the report document

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::detectors::{
    default_detectors, DetectionContext, DetectionOutcome, Detector, DetectorEngineBuilder,
    ProgressCallback,
};
use crate::graph::{ClaimGraph, GraphIndex, RelationGraph};
use crate::models::{FraudReport, ReportSummary, SubgraphSummary};

/// Full analysis pipeline.
pub struct Pipeline {
    config: ProjectConfig,
    detectors: Vec<Arc<dyn Detector>>,
    progress_callback: Option<ProgressCallback>,
}

impl Pipeline {
    /// Create a pipeline running the detectors `config` enables.
    pub fn new(config: ProjectConfig) -> Self {
        let detectors = default_detectors(&config);
        Self {
            config,
            detectors,
            progress_callback: None,
        }
    }

    /// Report detector completion.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Run detection and build the report.
    pub fn run(self, graph: &ClaimGraph) -> Result<FraudReport> {
        let start = Instant::now();
        let index = GraphIndex::build(graph);
        let ctx = DetectionContext::new(graph, &index);

        let mut builder = DetectorEngineBuilder::new()
            .workers(self.config.engine.workers)
            .parallel(self.config.engine.parallel)
            .detectors(self.detectors);
        if let Some(callback) = self.progress_callback {
            builder = builder.on_progress(callback);
        }
        let engine = builder.build();
        info!("Running detectors: {}", engine.detector_names().join(", "));

        let outcome = engine.run(&ctx)?;
        let report = build_report(graph, outcome, &self.config);

        info!(
            "Analysis complete: {} findings, {} suspicious entities, {} high-value leads in {:?}",
            report.findings.total(),
            report.summary.suspicious_entities,
            report.summary.high_value_leads,
            start.elapsed()
        );
        Ok(report)
    }
}

/// Analyze a graph with the detectors and settings of `config`.
pub fn analyze(graph: &ClaimGraph, config: &ProjectConfig) -> Result<FraudReport> {
    Pipeline::new(config.clone()).run(graph)
}

/// Turn a detection outcome into the output document.
pub fn build_report(
    graph: &ClaimGraph,
    outcome: DetectionOutcome,
    config: &ProjectConfig,
) -> FraudReport {
    let flags = outcome.flags;
    let leads = flags.leads(config.report.lead_min_indicators);
    let high_value_leads = leads.len();

    let relations = RelationGraph::build(graph);
    let seeds = graph
        .nodes()
        .iter()
        .filter(|n| n.name().is_some_and(|name| flags.contains(name)))
        .map(|n| n.id.as_str());
    let neighborhood = relations.neighborhood(seeds);
    debug!(
        "Suspicious neighbourhood: {} nodes, {} edges",
        neighborhood.node_ids.len(),
        neighborhood.edge_count
    );

    FraudReport {
        summary: ReportSummary {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            suspicious_entities: flags.len(),
            high_value_leads,
            outlier_statistics: outcome.outlier_stats,
        },
        findings: outcome.findings,
        fraud_flags: flags.to_report(),
        leads: leads
            .into_iter()
            .take(config.report.top_leads)
            .collect(),
        suspicious_subgraph: SubgraphSummary {
            node_count: neighborhood.node_ids.len(),
            edge_count: neighborhood.edge_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ClaimEdge, ClaimNode, EdgeKind};
    use crate::models::{FlagLabel, Severity};

    fn ring() -> ClaimGraph {
        ClaimGraph::new(
            vec![
                ClaimNode::accident("a1"),
                ClaimNode::accident("a2"),
                ClaimNode::accident("a3"),
                ClaimNode::car("c1", "RING-1"),
                ClaimNode::participant("p1", "ANNA")
                    .with_role("Driver")
                    .with_dates(&["2024-01-01"]),
                ClaimNode::participant("p2", "ANNA")
                    .with_role("Passenger")
                    .with_dates(&["2024-01-20"]),
                ClaimNode::participant("p3", "BEN")
                    .with_role("Driver")
                    .with_dates(&["2024-06-01"]),
                ClaimNode::witness("w1", "WALT"),
                ClaimNode::accident("lonely"),
            ],
            vec![
                ClaimEdge::new("c1", "a1", EdgeKind::Involves),
                ClaimEdge::new("c1", "a2", EdgeKind::Involves),
                ClaimEdge::new("c1", "a3", EdgeKind::Involves),
                ClaimEdge::new("p1", "c1", EdgeKind::Drives),
                ClaimEdge::new("p2", "c1", EdgeKind::IsPassenger),
                ClaimEdge::new("w1", "a1", EdgeKind::Witnesses),
                ClaimEdge::new("w1", "a2", EdgeKind::Witnesses),
                ClaimEdge::new("p3", "a3", EdgeKind::Involves),
            ],
        )
    }

    #[test]
    fn test_report_combines_all_detectors() {
        let graph = ring();
        let report = analyze(&graph, &ProjectConfig::default()).expect("analysis");

        assert_eq!(report.summary.total_nodes, 9);
        assert_eq!(report.summary.total_edges, 8);
        assert_eq!(report.findings.repeated_cars.len(), 1);
        assert_eq!(report.findings.repeated_cars[0].severity, Severity::High);
        assert_eq!(report.findings.repeated_witnesses.len(), 1);
        assert_eq!(report.findings.time_patterns.len(), 1);
        assert_eq!(report.findings.role_switching.len(), 1);

        assert_eq!(
            report.fraud_flags["ANNA"],
            vec![
                FlagLabel::TimeCluster,
                FlagLabel::RepeatedCar,
                FlagLabel::RoleSwitching
            ]
        );
        assert_eq!(report.summary.suspicious_entities, 2);
        assert_eq!(report.summary.high_value_leads, 1);
        assert_eq!(report.leads[0].name, "ANNA");
        assert_eq!(report.leads[0].indicator_count, 3);
    }

    #[test]
    fn test_subgraph_spans_flagged_neighbours() {
        let graph = ring();
        let report = analyze(&graph, &ProjectConfig::default()).expect("analysis");
        // p1, p2, w1 plus c1, a1, a2
        assert_eq!(report.suspicious_subgraph.node_count, 6);
        // p1->c1, p2->c1, c1->a1, c1->a2, w1->a1, w1->a2
        assert_eq!(report.suspicious_subgraph.edge_count, 6);
    }

    #[test]
    fn test_empty_graph_yields_empty_report() {
        let report = analyze(&ClaimGraph::default(), &ProjectConfig::default()).expect("analysis");
        assert!(report.findings.is_empty());
        assert!(report.fraud_flags.is_empty());
        assert!(report.leads.is_empty());
        assert_eq!(report.suspicious_subgraph, SubgraphSummary::default());
    }

    #[test]
    fn test_rerun_is_identical() {
        let graph = ring();
        let first = analyze(&graph, &ProjectConfig::default()).expect("first");
        let second = analyze(&graph, &ProjectConfig::default()).expect("second");
        let a = serde_json::to_string(&first).expect("serialize");
        let b = serde_json::to_string(&second).expect("serialize");
        assert_eq!(a, b);
    }

    #[test]
    fn test_professionals_opt_in() {
        let mut graph_nodes = ring().nodes().to_vec();
        graph_nodes.push(ClaimNode::person("d1", crate::graph::NodeKind::Doctor, "DR X"));
        let mut edges = ring().edges().to_vec();
        edges.push(ClaimEdge::new("d1", "p1", EdgeKind::Heals));
        edges.push(ClaimEdge::new("d1", "w1", EdgeKind::Heals));
        let graph = ClaimGraph::new(graph_nodes, edges);

        let default_report = analyze(&graph, &ProjectConfig::default()).expect("analysis");
        assert!(default_report.findings.suspicious_professionals.is_empty());

        let mut config = ProjectConfig::default();
        config.set_enabled("SuspiciousProfessionalDetector", true);
        let report = analyze(&graph, &config).expect("analysis");
        assert_eq!(report.findings.suspicious_professionals.len(), 1);
        assert!(report.fraud_flags.contains_key("DR X"));
    }

    #[test]
    fn test_top_leads_limit() {
        let graph = ring();
        let mut config = ProjectConfig::default();
        config.report.lead_min_indicators = 1;
        config.report.top_leads = 1;
        let report = analyze(&graph, &config).expect("analysis");
        assert_eq!(report.summary.high_value_leads, 2);
        assert_eq!(report.leads.len(), 1);
    }

    #[test]
    fn test_progress_reports_each_enabled_detector() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut config = ProjectConfig::default();
        config.engine.parallel = false;
        config.set_enabled("role-switching", false);

        Pipeline::new(config)
            .with_progress_callback(Box::new(move |name, done, total| {
                if let Ok(mut seen) = sink.lock() {
                    seen.push((name.to_string(), done, total));
                }
            }))
            .run(&ring())
            .expect("analysis");

        let seen = seen.lock().expect("lock");
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|(_, _, total)| *total == 4));
        assert!(!seen.iter().any(|(name, _, _)| name == "RoleSwitchingDetector"));
        assert_eq!(seen.last().map(|(_, done, _)| *done), Some(4));
    }
}
