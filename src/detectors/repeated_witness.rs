//! Repeated witness detector
//!
//! Flags a witness name tied by `witnesses` edges to more than one distinct
//! accident. Duplicate edges to the same accident count once.

use crate::detectors::base::{DetectionContext, Detector, DetectorConfig, DetectorOutput};
use crate::detectors::flags::FraudFlags;
use crate::models::{FlagLabel, RepeatedWitnessFinding, Severity};
use rustc_hash::FxHashSet;

pub struct RepeatedWitnessDetector {
    min_accidents: usize,
}

impl RepeatedWitnessDetector {
    pub fn new() -> Self {
        Self {
            min_accidents: 2,
        }
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            min_accidents: config.get_option_in("min_accidents", 2, 2..=usize::MAX),
        }
    }
}

impl Default for RepeatedWitnessDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for RepeatedWitnessDetector {
    fn name(&self) -> &'static str {
        "RepeatedWitnessDetector"
    }

    fn description(&self) -> &'static str {
        "Detects witnesses appearing at multiple unrelated accidents"
    }

    fn label(&self) -> FlagLabel {
        FlagLabel::RepeatedWitness
    }

    fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput {
        let mut findings = Vec::new();

        for (&name, accidents) in &ctx.index.witness_to_accidents {
            let distinct: FxHashSet<&str> = accidents.iter().copied().collect();
            let count = distinct.len();
            if count < self.min_accidents {
                continue;
            }

            findings.push(RepeatedWitnessFinding {
                name: name.to_string(),
                kind: FlagLabel::RepeatedWitness,
                accident_count: count,
                severity: Severity::from_repeat_count(count),
                details: format!("Witnessed {} different accidents", count),
            });
            flags.raise(name, FlagLabel::RepeatedWitness);
        }

        DetectorOutput::RepeatedWitnesses(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ClaimEdge, ClaimGraph, ClaimNode, EdgeKind, GraphIndex};

    fn run(graph: &ClaimGraph) -> (Vec<RepeatedWitnessFinding>, FraudFlags) {
        let index = GraphIndex::build(graph);
        let ctx = DetectionContext::new(graph, &index);
        let mut flags = FraudFlags::new();
        match RepeatedWitnessDetector::new().detect(&ctx, &mut flags) {
            DetectorOutput::RepeatedWitnesses(findings) => (findings, flags),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_two_accidents_is_medium() {
        let graph = ClaimGraph::new(
            vec![ClaimNode::witness("w1", "WALT")],
            vec![
                ClaimEdge::new("w1", "a1", EdgeKind::Witnesses),
                ClaimEdge::new("w1", "a2", EdgeKind::Witnesses),
            ],
        );
        let (findings, flags) = run(&graph);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].accident_count, 2);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].details, "Witnessed 2 different accidents");
        assert!(flags.has("WALT", FlagLabel::RepeatedWitness));
    }

    #[test]
    fn test_duplicate_edges_count_once() {
        let graph = ClaimGraph::new(
            vec![ClaimNode::witness("w1", "WALT")],
            vec![
                ClaimEdge::new("w1", "a1", EdgeKind::Witnesses),
                ClaimEdge::new("w1", "a1", EdgeKind::Witnesses),
            ],
        );
        let (findings, flags) = run(&graph);
        assert!(findings.is_empty());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_records_pooled_by_name() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::witness("w1", "WALT"),
                ClaimNode::witness("w2", "WALT"),
            ],
            vec![
                ClaimEdge::new("w1", "a1", EdgeKind::Witnesses),
                ClaimEdge::new("w2", "a2", EdgeKind::Witnesses),
                ClaimEdge::new("w2", "a3", EdgeKind::Witnesses),
                ClaimEdge::new("w2", "a4", EdgeKind::Involves),
            ],
        );
        let (findings, _) = run(&graph);
        assert_eq!(findings[0].accident_count, 3);
        assert_eq!(findings[0].severity, Severity::High);
    }
}
