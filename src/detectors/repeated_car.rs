//! Repeated vehicle detector
//!
//! A plate linked by `involves` edges to more than one accident is flagged.
//! The finding names the car, but the flag goes to the people: everyone
//! reaching a car node with that plate through a `drives` or `isPassenger`
//! edge pointing at the car is credited with `REPEATED_CAR`.

use crate::detectors::base::{DetectionContext, Detector, DetectorConfig, DetectorOutput};
use crate::detectors::flags::FraudFlags;
use crate::models::{FlagLabel, RepeatedCarFinding, Severity};
use tracing::debug;

pub struct RepeatedCarDetector {
    /// Accidents a plate needs before it is reported
    min_accidents: usize,
}

impl RepeatedCarDetector {
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

    /// Names of everyone occupying a car node with this plate
    fn occupants<'g>(ctx: &DetectionContext<'g>, plate: &str) -> Vec<&'g str> {
        let mut names = Vec::new();
        for car in ctx.graph.nodes().iter().filter(|n| n.plate() == Some(plate)) {
            for edge in ctx.graph.edges_to(&car.id) {
                if !edge.kind.is_vehicle_occupancy() {
                    continue;
                }
                if let Some(name) = ctx.graph.node(&edge.from).and_then(|n| n.name()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl Default for RepeatedCarDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for RepeatedCarDetector {
    fn name(&self) -> &'static str {
        "RepeatedCarDetector"
    }

    fn description(&self) -> &'static str {
        "Detects vehicles involved in multiple accidents and credits their occupants"
    }

    fn label(&self) -> FlagLabel {
        FlagLabel::RepeatedCar
    }

    fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput {
        let mut findings = Vec::new();

        for (&plate, accidents) in &ctx.index.car_to_accidents {
            let count = accidents.len();
            if count < self.min_accidents {
                continue;
            }

            findings.push(RepeatedCarFinding {
                car: plate.to_string(),
                kind: FlagLabel::RepeatedCar,
                accident_count: count,
                severity: Severity::from_repeat_count(count),
                details: format!("Car {} involved in {} accidents", plate, count),
            });

            let occupants = Self::occupants(ctx, plate);
            debug!("Car {} credits {} occupant edges", plate, occupants.len());
            for name in occupants {
                flags.raise(name, FlagLabel::RepeatedCar);
            }
        }

        DetectorOutput::RepeatedCars(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ClaimEdge, ClaimGraph, ClaimNode, EdgeKind, GraphIndex};

    fn run(graph: &ClaimGraph) -> (Vec<RepeatedCarFinding>, FraudFlags) {
        let index = GraphIndex::build(graph);
        let ctx = DetectionContext::new(graph, &index);
        let mut flags = FraudFlags::new();
        match RepeatedCarDetector::new().detect(&ctx, &mut flags) {
            DetectorOutput::RepeatedCars(findings) => (findings, flags),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_three_accidents_is_high_and_credits_occupants() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::accident("a1"),
                ClaimNode::accident("a2"),
                ClaimNode::accident("a3"),
                ClaimNode::car("c1", "AB-123"),
                ClaimNode::participant("p1", "DRIVER"),
                ClaimNode::participant("p2", "RIDER"),
                ClaimNode::participant("p3", "BYSTANDER"),
            ],
            vec![
                ClaimEdge::new("c1", "a1", EdgeKind::Involves),
                ClaimEdge::new("c1", "a2", EdgeKind::Involves),
                ClaimEdge::new("c1", "a3", EdgeKind::Involves),
                ClaimEdge::new("p1", "c1", EdgeKind::Drives),
                ClaimEdge::new("p2", "c1", EdgeKind::IsPassenger),
                ClaimEdge::new("p3", "c1", EdgeKind::Witnesses),
            ],
        );
        let (findings, flags) = run(&graph);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].car, "AB-123");
        assert_eq!(findings[0].accident_count, 3);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].details, "Car AB-123 involved in 3 accidents");

        assert!(flags.has("DRIVER", FlagLabel::RepeatedCar));
        assert!(flags.has("RIDER", FlagLabel::RepeatedCar));
        assert!(!flags.contains("BYSTANDER"));
        assert!(!flags.contains("AB-123"));
    }

    #[test]
    fn test_edges_from_car_do_not_credit() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::car("c1", "XY-1"),
                ClaimNode::participant("p1", "ANNA"),
            ],
            vec![
                ClaimEdge::new("c1", "a1", EdgeKind::Involves),
                ClaimEdge::new("c1", "a2", EdgeKind::Involves),
                ClaimEdge::new("c1", "p1", EdgeKind::Drives),
            ],
        );
        let (findings, flags) = run(&graph);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_single_accident_and_dangling_occupant() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::car("c1", "ONE-1"),
                ClaimNode::car("c2", "TWO-2"),
            ],
            vec![
                ClaimEdge::new("c1", "a1", EdgeKind::Involves),
                ClaimEdge::new("c2", "a1", EdgeKind::Involves),
                ClaimEdge::new("c2", "a2", EdgeKind::Involves),
                ClaimEdge::new("ghost", "c2", EdgeKind::Drives),
            ],
        );
        let (findings, flags) = run(&graph);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].car, "TWO-2");
        assert!(flags.is_empty());
    }

    #[test]
    fn test_shared_plate_pools_accidents_and_occupants() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::car("c1", "SAME"),
                ClaimNode::car("c2", "SAME"),
                ClaimNode::participant("p1", "ANNA"),
                ClaimNode::participant("p2", "BEN"),
            ],
            vec![
                ClaimEdge::new("c1", "a1", EdgeKind::Involves),
                ClaimEdge::new("c2", "a2", EdgeKind::Involves),
                ClaimEdge::new("p1", "c1", EdgeKind::Drives),
                ClaimEdge::new("p2", "c2", EdgeKind::Drives),
            ],
        );
        let (findings, flags) = run(&graph);
        assert_eq!(findings[0].accident_count, 2);
        assert!(flags.contains("ANNA"));
        assert!(flags.contains("BEN"));
    }

    #[test]
    fn test_min_accidents_below_two_keeps_default() {
        let config = DetectorConfig::new().with_option("min_accidents", serde_json::json!(1));
        assert_eq!(RepeatedCarDetector::with_config(config).min_accidents, 2);
        let config = DetectorConfig::new().with_option("min_accidents", serde_json::json!(3));
        assert_eq!(RepeatedCarDetector::with_config(config).min_accidents, 3);
    }
}
