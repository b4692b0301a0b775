//! Base detector trait and types
//!
//! This module defines the core abstractions for claim-graph detection:
//! - `Detector` trait that all detectors must implement
//! - `DetectionContext` with the graph and indexes a detector reads
//! - `DetectorOutput` / `DetectorResult` for capturing execution results
//! - `DetectorConfig` for per-detector thresholds

use crate::config::ProjectConfig;
use crate::detectors::flags::FraudFlags;
use crate::graph::{ClaimGraph, GraphIndex};
use crate::models::{
    Findings, FlagLabel, OutlierFinding, OutlierStats, ProfessionalFinding, RepeatedCarFinding,
    RepeatedWitnessFinding, RoleSwitchFinding, Severity, TimeClusterFinding,
};
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;
use tracing::warn;

/// Read-only inputs shared by every detector in a run
#[derive(Clone, Copy)]
pub struct DetectionContext<'g> {
    pub graph: &'g ClaimGraph,
    pub index: &'g GraphIndex<'g>,
    /// Merged flags of the independent detectors; only set for dependent ones
    pub prior_flags: Option<&'g FraudFlags>,
}

impl<'g> DetectionContext<'g> {
    pub fn new(graph: &'g ClaimGraph, index: &'g GraphIndex<'g>) -> Self {
        Self {
            graph,
            index,
            prior_flags: None,
        }
    }

    pub fn with_prior_flags(mut self, flags: &'g FraudFlags) -> Self {
        self.prior_flags = Some(flags);
        self
    }
}

/// Findings produced by one detector
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorOutput {
    StatisticalOutliers {
        findings: Vec<OutlierFinding>,
        stats: OutlierStats,
    },
    TimePatterns(Vec<TimeClusterFinding>),
    RepeatedCars(Vec<RepeatedCarFinding>),
    RepeatedWitnesses(Vec<RepeatedWitnessFinding>),
    RoleSwitching(Vec<RoleSwitchFinding>),
    SuspiciousProfessionals(Vec<ProfessionalFinding>),
}

impl DetectorOutput {
    pub fn len(&self) -> usize {
        match self {
            DetectorOutput::StatisticalOutliers { findings, .. } => findings.len(),
            DetectorOutput::TimePatterns(f) => f.len(),
            DetectorOutput::RepeatedCars(f) => f.len(),
            DetectorOutput::RepeatedWitnesses(f) => f.len(),
            DetectorOutput::RoleSwitching(f) => f.len(),
            DetectorOutput::SuspiciousProfessionals(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn severities(&self) -> Vec<Severity> {
        match self {
            DetectorOutput::StatisticalOutliers { findings, .. } => {
                findings.iter().map(|f| f.severity).collect()
            }
            DetectorOutput::TimePatterns(f) => f.iter().map(|f| f.severity).collect(),
            DetectorOutput::RepeatedCars(f) => f.iter().map(|f| f.severity).collect(),
            DetectorOutput::RepeatedWitnesses(f) => f.iter().map(|f| f.severity).collect(),
            DetectorOutput::RoleSwitching(f) => f.iter().map(|f| f.severity).collect(),
            DetectorOutput::SuspiciousProfessionals(f) => f.iter().map(|f| f.severity).collect(),
        }
    }

    /// Move these findings into their group; returns outlier statistics if any
    pub fn merge_into(self, findings: &mut Findings) -> Option<OutlierStats> {
        match self {
            DetectorOutput::StatisticalOutliers { findings: f, stats } => {
                findings.statistical_outliers.extend(f);
                return Some(stats);
            }
            DetectorOutput::TimePatterns(f) => findings.time_patterns.extend(f),
            DetectorOutput::RepeatedCars(f) => findings.repeated_cars.extend(f),
            DetectorOutput::RepeatedWitnesses(f) => findings.repeated_witnesses.extend(f),
            DetectorOutput::RoleSwitching(f) => findings.role_switching.extend(f),
            DetectorOutput::SuspiciousProfessionals(f) => {
                findings.suspicious_professionals.extend(f)
            }
        }
        None
    }
}

/// Result from running a single detector
#[derive(Debug, Clone)]
pub struct DetectorResult {
    /// Name of the detector that produced these results
    pub detector_name: String,
    /// Findings, absent when the detector failed
    pub output: Option<DetectorOutput>,
    /// Flags this detector raised
    pub flags: FraudFlags,
    /// Execution time in milliseconds
    pub duration_ms: u64,
    /// Error message if the detector failed
    pub error: Option<String>,
}

impl DetectorResult {
    /// Create a successful result
    pub fn success(
        detector_name: String,
        output: DetectorOutput,
        flags: FraudFlags,
        duration_ms: u64,
    ) -> Self {
        Self {
            detector_name,
            output: Some(output),
            flags,
            duration_ms,
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(detector_name: String, error: String, duration_ms: u64) -> Self {
        Self {
            detector_name,
            output: None,
            flags: FraudFlags::new(),
            duration_ms,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Configuration options for detectors
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    /// Detector-specific thresholds and options
    pub options: HashMap<String, serde_json::Value>,
}

impl DetectorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the threshold overrides a project config holds for `detector_name`
    pub fn from_project_config(project: &ProjectConfig, detector_name: &str) -> Self {
        let options = project
            .detector_override(detector_name)
            .map(|o| {
                o.thresholds
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect()
            })
            .unwrap_or_default();
        Self { options }
    }

    /// Set a custom option
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Get a typed option value
    ///
    /// A value of the wrong type is ignored with a warning.
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.options.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Ignoring threshold {} = {}: {}", key, value, e);
                None
            }
        }
    }

    /// Get an option with a default value
    pub fn get_option_or<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_option(key).unwrap_or(default)
    }

    /// Get an option that must lie in `range`; out-of-range values fall back
    /// to `default` with a warning
    pub fn get_option_in<T>(&self, key: &str, default: T, range: RangeInclusive<T>) -> T
    where
        T: serde::de::DeserializeOwned + PartialOrd + std::fmt::Display,
    {
        match self.get_option::<T>(key) {
            Some(v) if range.contains(&v) => v,
            Some(v) => {
                warn!(
                    "Ignoring threshold {} = {}: expected {}..={}, using {}",
                    key,
                    v,
                    range.start(),
                    range.end(),
                    default
                );
                default
            }
            None => default,
        }
    }
}

/// Trait for all claim-graph detectors
///
/// A detector reads the graph and its indexes, returns its findings and
/// records its label against every entity it implicates.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyDetector;
///
/// impl Detector for MyDetector {
///     fn name(&self) -> &'static str {
///         "MyDetector"
///     }
///
///     fn description(&self) -> &'static str {
///         "Detects my specific pattern"
///     }
///
///     fn label(&self) -> FlagLabel {
///         FlagLabel::TimeCluster
///     }
///
///     fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput {
///         DetectorOutput::TimePatterns(vec![])
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector (e.g. "RepeatedCarDetector")
    fn name(&self) -> &'static str;

    /// Human-readable description of what this detector finds
    fn description(&self) -> &'static str;

    /// Label recorded against implicated entities
    fn label(&self) -> FlagLabel;

    /// Run detection
    ///
    /// Must be total over any graph: malformed nodes are skipped and
    /// dangling references count as no relationship.
    fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput;

    /// Whether this detector reads the flags raised by the others
    ///
    /// Dependent detectors run sequentially after all independent detectors
    /// have completed and their flags have been merged.
    ///
    /// Default: `false` (independent)
    fn is_dependent(&self) -> bool {
        false
    }

    /// Whether the detector runs when the config does not mention it
    fn enabled_by_default(&self) -> bool {
        true
    }
}

/// Progress callback for detector execution
pub type ProgressCallback = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Summary statistics from running all detectors
#[derive(Debug, Clone, Default)]
pub struct DetectionSummary {
    /// Total number of detectors run
    pub detectors_run: usize,
    /// Number of detectors that succeeded
    pub detectors_succeeded: usize,
    /// Number of detectors that failed
    pub detectors_failed: usize,
    /// Total findings across all detectors
    pub total_findings: usize,
    /// Findings by severity
    pub by_severity: BTreeMap<Severity, usize>,
    /// Total execution time in milliseconds
    pub total_duration_ms: u64,
}

impl DetectionSummary {
    /// Update summary with a detector result
    pub fn add_result(&mut self, result: &DetectorResult) {
        self.detectors_run += 1;
        self.total_duration_ms += result.duration_ms;

        match &result.output {
            Some(output) => {
                self.detectors_succeeded += 1;
                self.total_findings += output.len();
                for severity in output.severities() {
                    *self.by_severity.entry(severity).or_insert(0) += 1;
                }
            }
            None => self.detectors_failed += 1,
        }
    }
}
