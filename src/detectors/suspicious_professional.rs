//! Suspicious professional detector
//!
//! Runs after the independent detectors and reads their merged flags. A
//! doctor or lawyer whose `heals`/`represents` clients include several
//! already-flagged people is flagged in turn. Off unless enabled in config.

use crate::detectors::base::{DetectionContext, Detector, DetectorConfig, DetectorOutput};
use crate::detectors::flags::FraudFlags;
use crate::graph::ClaimNode;
use crate::models::{FlagLabel, ProfessionalFinding, Severity};
use indexmap::IndexSet;
use tracing::warn;

pub struct SuspiciousProfessionalDetector {
    min_clients: usize,
}

impl SuspiciousProfessionalDetector {
    pub fn new() -> Self {
        Self {
            min_clients: 2,
        }
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            min_clients: config.get_option_in("min_clients", 2, 1..=usize::MAX),
        }
    }

    /// Names on the other end of every client-service edge touching `node`
    fn clients<'g>(ctx: &DetectionContext<'g>, node: &ClaimNode) -> Vec<&'g str> {
        let outgoing = ctx
            .graph
            .edges_from(&node.id)
            .filter(|e| e.kind.is_client_service())
            .map(|e| e.to.as_str());
        let incoming = ctx
            .graph
            .edges_to(&node.id)
            .filter(|e| e.kind.is_client_service())
            .map(|e| e.from.as_str());
        outgoing
            .chain(incoming)
            .filter(|&id| id != node.id)
            .filter_map(|id| ctx.graph.node(id).and_then(|n| n.name()))
            .collect()
    }
}

impl Default for SuspiciousProfessionalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SuspiciousProfessionalDetector {
    fn name(&self) -> &'static str {
        "SuspiciousProfessionalDetector"
    }

    fn description(&self) -> &'static str {
        "Detects doctors and lawyers serving several already-flagged clients"
    }

    fn label(&self) -> FlagLabel {
        FlagLabel::SuspiciousProfessional
    }

    fn is_dependent(&self) -> bool {
        true
    }

    fn enabled_by_default(&self) -> bool {
        false
    }

    fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput {
        let Some(prior) = ctx.prior_flags else {
            warn!("{} ran without prior flags; skipping", self.name());
            return DetectorOutput::SuspiciousProfessionals(vec![]);
        };

        let mut findings = Vec::new();
        for (&name, nodes) in &ctx.index.person_to_nodes {
            let professional: Vec<&ClaimNode> = nodes
                .iter()
                .copied()
                .filter(|n| n.kind.is_professional())
                .collect();
            let Some(first) = professional.first() else {
                continue;
            };

            let mut flagged: IndexSet<&str> = IndexSet::new();
            for node in &professional {
                flagged.extend(
                    Self::clients(ctx, node)
                        .into_iter()
                        .filter(|&client| client != name && prior.contains(client)),
                );
            }
            if flagged.len() < self.min_clients {
                continue;
            }

            let count = flagged.len();
            findings.push(ProfessionalFinding {
                name: name.to_string(),
                kind: FlagLabel::SuspiciousProfessional,
                profession: first.kind.to_string(),
                suspicious_clients: count,
                clients: flagged.into_iter().map(str::to_string).collect(),
                severity: Severity::from_repeat_count(count),
                details: format!("Serves {} flagged clients", count),
            });
            flags.raise(name, FlagLabel::SuspiciousProfessional);
        }

        DetectorOutput::SuspiciousProfessionals(findings)
    }
}
