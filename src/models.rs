//! Core data models for claimgraph
//!
//! These models are shared by the detectors, the engine and the reporters:
//! severities, indicator labels, per-detector findings and the final report.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    /// HIGH at three or more linked accidents, MEDIUM otherwise
    pub fn from_repeat_count(count: usize) -> Self {
        if count >= 3 {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// Indicator label recorded against an entity when a detector fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagLabel {
    StatisticalOutlier,
    TimeCluster,
    RepeatedCar,
    RepeatedWitness,
    RoleSwitching,
    SuspiciousProfessional,
}

impl FlagLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagLabel::StatisticalOutlier => "STATISTICAL_OUTLIER",
            FlagLabel::TimeCluster => "TIME_CLUSTER",
            FlagLabel::RepeatedCar => "REPEATED_CAR",
            FlagLabel::RepeatedWitness => "REPEATED_WITNESS",
            FlagLabel::RoleSwitching => "ROLE_SWITCHING",
            FlagLabel::SuspiciousProfessional => "SUSPICIOUS_PROFESSIONAL",
        }
    }
}

impl std::fmt::Display for FlagLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant whose distinct-accident count exceeds the IQR threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierFinding {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlagLabel,
    pub accident_count: usize,
    pub threshold: f64,
    pub severity: Severity,
    pub details: String,
}

/// Person with several accidents inside one rolling window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeClusterFinding {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlagLabel,
    pub accidents_in_window: usize,
    pub window_days: i64,
    pub severity: Severity,
    pub details: String,
}

/// Vehicle linked to more than one accident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatedCarFinding {
    pub car: String,
    #[serde(rename = "type")]
    pub kind: FlagLabel,
    pub accident_count: usize,
    pub severity: Severity,
    pub details: String,
}

/// Witness present at more than one distinct accident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatedWitnessFinding {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlagLabel,
    pub accident_count: usize,
    pub severity: Severity,
    pub details: String,
}

/// Person recorded both as Driver and as Passenger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSwitchFinding {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlagLabel,
    pub roles: Vec<String>,
    pub severity: Severity,
    pub details: String,
}

/// Doctor or lawyer serving several already-flagged clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalFinding {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlagLabel,
    pub profession: String,
    pub suspicious_clients: usize,
    pub clients: Vec<String>,
    pub severity: Severity,
    pub details: String,
}

/// Sample statistics computed by the outlier detector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierStats {
    pub mean: f64,
    pub threshold: f64,
    pub max: usize,
}

/// All findings of one run, grouped by detector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub statistical_outliers: Vec<OutlierFinding>,
    pub time_patterns: Vec<TimeClusterFinding>,
    pub repeated_cars: Vec<RepeatedCarFinding>,
    pub repeated_witnesses: Vec<RepeatedWitnessFinding>,
    pub role_switching: Vec<RoleSwitchFinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suspicious_professionals: Vec<ProfessionalFinding>,
}

impl Findings {
    /// Total findings across all groups
    pub fn total(&self) -> usize {
        self.statistical_outliers.len()
            + self.time_patterns.len()
            + self.repeated_cars.len()
            + self.repeated_witnesses.len()
            + self.role_switching.len()
            + self.suspicious_professionals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// An entity ranked by the number of distinct indicators raised against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub indicator_count: usize,
    pub indicators: Vec<FlagLabel>,
}

/// Size of the neighbourhood around flagged entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
}

/// Headline numbers of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub suspicious_entities: usize,
    pub high_value_leads: usize,
    pub outlier_statistics: OutlierStats,
}

/// The output document of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudReport {
    pub summary: ReportSummary,
    pub findings: Findings,
    pub fraud_flags: IndexMap<String, Vec<FlagLabel>>,
    pub leads: Vec<Lead>,
    pub suspicious_subgraph: SubgraphSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_repeat_count() {
        assert_eq!(Severity::from_repeat_count(2), Severity::Medium);
        assert_eq!(Severity::from_repeat_count(3), Severity::High);
        assert_eq!(Severity::from_repeat_count(7), Severity::High);
        assert!(Severity::High > Severity::Medium);
    }

    #[test]
    fn test_flag_label_serializes_screaming_snake() {
        let json = serde_json::to_string(&FlagLabel::RepeatedCar).expect("serialize label");
        assert_eq!(json, "\"REPEATED_CAR\"");
        assert_eq!(FlagLabel::TimeCluster.to_string(), "TIME_CLUSTER");
    }

    #[test]
    fn test_finding_type_field() {
        let finding = RepeatedCarFinding {
            car: "AB-123".into(),
            kind: FlagLabel::RepeatedCar,
            accident_count: 2,
            severity: Severity::Medium,
            details: "Car AB-123 involved in 2 accidents".into(),
        };
        let value = serde_json::to_value(&finding).expect("serialize finding");
        assert_eq!(value["type"], "REPEATED_CAR");
        assert_eq!(value["severity"], "MEDIUM");
        assert_eq!(value["car"], "AB-123");
    }

    #[test]
    fn test_professionals_omitted_when_empty() {
        let value = serde_json::to_value(Findings::default()).expect("serialize findings");
        assert!(value.get("suspicious_professionals").is_none());
        assert!(value["statistical_outliers"].as_array().is_some());
    }
}
