//! Statistical outlier detector
//!
//! Flags participants whose number of distinct accidents is abnormally high
//! relative to everyone else. Accidents are counted per person name as the
//! set of distinct enrollment dates across all of that person's Participant
//! records, and the cut-off is `mean + k * IQR` (k = 1.5 by default).

use crate::detectors::base::{DetectionContext, Detector, DetectorConfig, DetectorOutput};
use crate::detectors::flags::FraudFlags;
use crate::graph::{ClaimGraph, NodeKind};
use crate::models::{FlagLabel, OutlierFinding, OutlierStats, Severity};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Detects people involved in unusually many accidents.
pub struct StatisticalOutlierDetector {
    /// IQR multiplier added on top of the mean
    iqr_multiplier: f64,
    /// Below this many people the threshold degenerates to the maximum
    min_sample: usize,
}

impl StatisticalOutlierDetector {
    pub fn new() -> Self {
        Self {
            iqr_multiplier: 1.5,
            min_sample: 4,
        }
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            iqr_multiplier: config.get_option_in("iqr_multiplier", 1.5, 0.0..=100.0),
            min_sample: config.get_option_in("min_sample", 4, 1..=usize::MAX),
        }
    }

    /// Distinct enrollment dates per participant name, in first-seen order
    fn accident_counts(graph: &ClaimGraph) -> IndexMap<&str, usize> {
        let mut dates: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        for node in graph.nodes() {
            if node.kind != NodeKind::Participant {
                continue;
            }
            let Some(person) = node.person_info() else {
                continue;
            };
            dates
                .entry(person.name.as_str())
                .or_default()
                .extend(person.enter.iter().map(String::as_str));
        }
        dates.into_iter().map(|(name, d)| (name, d.len())).collect()
    }

    /// Mean, threshold and max of a count sample
    pub fn compute_stats(&self, counts: &[usize]) -> OutlierStats {
        if counts.is_empty() {
            return OutlierStats::default();
        }

        let max = counts.iter().copied().max().unwrap_or(0);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;

        let threshold = if counts.len() < self.min_sample.max(2) {
            max as f64
        } else {
            let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let (q1, q3) = quartiles(&sorted);
            mean + self.iqr_multiplier * (q3 - q1)
        };

        OutlierStats {
            mean,
            threshold,
            max,
        }
    }
}

impl Default for StatisticalOutlierDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// First and third quartiles of a sorted sample (at least two values).
///
/// Cut points split the sample into four equal-probability groups, placing
/// the i-th cut at rank `i * (n + 1) / 4` and interpolating between the
/// neighbouring order statistics.
fn quartiles(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len();
    let m = n + 1;
    let cut = |i: usize| -> f64 {
        let j = (i * m / 4).clamp(1, n - 1);
        let delta = (i * m) as f64 - (j * 4) as f64;
        (sorted[j - 1] * (4.0 - delta) + sorted[j] * delta) / 4.0
    };
    (cut(1), cut(3))
}

impl Detector for StatisticalOutlierDetector {
    fn name(&self) -> &'static str {
        "StatisticalOutlierDetector"
    }

    fn description(&self) -> &'static str {
        "Detects participants appearing in unusually many accidents (mean + 1.5 x IQR)"
    }

    fn label(&self) -> FlagLabel {
        FlagLabel::StatisticalOutlier
    }

    fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput {
        let per_person = Self::accident_counts(ctx.graph);
        let counts: Vec<usize> = per_person.values().copied().collect();
        let stats = self.compute_stats(&counts);

        let mut findings = Vec::new();
        for (name, count) in per_person {
            if count as f64 > stats.threshold {
                findings.push(OutlierFinding {
                    name: name.to_string(),
                    kind: FlagLabel::StatisticalOutlier,
                    accident_count: count,
                    threshold: stats.threshold,
                    severity: Severity::High,
                    details: format!(
                        "Involved in {} accidents (threshold: {:.2})",
                        count, stats.threshold
                    ),
                });
                flags.raise(name, FlagLabel::StatisticalOutlier);
            }
        }

        debug!(
            "Outliers: mean={:.2} threshold={:.2} max={} flagged={}",
            stats.mean,
            stats.threshold,
            stats.max,
            findings.len()
        );

        DetectorOutput::StatisticalOutliers { findings, stats }
    }
}
