//! Role switching detector
//!
//! Unions the Driver/Passenger tokens found in each Participant's role field
//! per person name. Anyone seen in both roles is flagged. Other tokens such
//! as `Witness` are ignored here.

use crate::detectors::base::{DetectionContext, Detector, DetectorOutput};
use crate::detectors::flags::FraudFlags;
use crate::graph::NodeKind;
use crate::models::{FlagLabel, RoleSwitchFinding, Severity};
use indexmap::{IndexMap, IndexSet};

const TRACKED_ROLES: [&str; 2] = ["Driver", "Passenger"];

#[derive(Default)]
pub struct RoleSwitchingDetector;

impl RoleSwitchingDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for RoleSwitchingDetector {
    fn name(&self) -> &'static str {
        "RoleSwitchingDetector"
    }

    fn description(&self) -> &'static str {
        "Detects people who appear as driver in some accidents and passenger in others"
    }

    fn label(&self) -> FlagLabel {
        FlagLabel::RoleSwitching
    }

    fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput {
        let mut person_roles: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        for node in ctx.graph.nodes() {
            if node.kind != NodeKind::Participant {
                continue;
            }
            let Some(person) = node.person_info() else {
                continue;
            };
            let roles = person.roles().filter(|r| TRACKED_ROLES.contains(r));
            person_roles
                .entry(person.name.as_str())
                .or_default()
                .extend(roles);
        }

        let mut findings = Vec::new();
        for (name, roles) in person_roles {
            if roles.len() < 2 {
                continue;
            }
            let roles: Vec<String> = roles.into_iter().map(str::to_string).collect();
            findings.push(RoleSwitchFinding {
                name: name.to_string(),
                kind: FlagLabel::RoleSwitching,
                details: format!(
                    "Appears as both {} in different accidents",
                    roles.join(" and ")
                ),
                roles,
                severity: Severity::Medium,
            });
            flags.raise(name, FlagLabel::RoleSwitching);
        }

        DetectorOutput::RoleSwitching(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ClaimGraph, ClaimNode, GraphIndex};

    fn run(graph: &ClaimGraph) -> (Vec<RoleSwitchFinding>, FraudFlags) {
        let index = GraphIndex::build(graph);
        let ctx = DetectionContext::new(graph, &index);
        let mut flags = FraudFlags::new();
        match RoleSwitchingDetector::new().detect(&ctx, &mut flags) {
            DetectorOutput::RoleSwitching(findings) => (findings, flags),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_driver_and_passenger_across_records() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::participant("p1", "ANNA").with_role("Driver"),
                ClaimNode::participant("p2", "ANNA").with_role("Passenger,Witness"),
            ],
            vec![],
        );
        let (findings, flags) = run(&graph);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].roles, vec!["Driver", "Passenger"]);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(
            findings[0].details,
            "Appears as both Driver and Passenger in different accidents"
        );
        assert!(flags.has("ANNA", FlagLabel::RoleSwitching));
    }

    #[test]
    fn test_single_role_is_not_flagged() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::participant("p1", "BEN").with_role("Driver"),
                ClaimNode::participant("p2", "BEN").with_role("Driver,Witness"),
                ClaimNode::participant("p3", "BEN"),
            ],
            vec![],
        );
        let (findings, flags) = run(&graph);
        assert!(findings.is_empty());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_witness_records_are_ignored() {
        let graph = ClaimGraph::new(
            vec![
                ClaimNode::participant("p1", "CARL").with_role("Driver"),
                ClaimNode::witness("w1", "CARL").with_role("Passenger"),
            ],
            vec![],
        );
        let (findings, _) = run(&graph);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_both_roles_in_one_field() {
        let graph = ClaimGraph::new(
            vec![ClaimNode::participant("p1", "DORA").with_role(" Passenger , Driver ")],
            vec![],
        );
        let (findings, _) = run(&graph);
        assert_eq!(findings[0].roles, vec!["Passenger", "Driver"]);
    }
}
