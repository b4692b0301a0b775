//! Time-clustering detector
//!
//! Flags a person who appears in several accidents inside a rolling window
//! (30 days by default). All parseable `%Y-%m-%d` enrollment dates of the
//! person's Participant records are pooled and sorted; the cluster size is
//! the largest number of dates that fit in any window starting at one of
//! them. Unparseable dates are dropped.

use crate::detectors::base::{DetectionContext, Detector, DetectorConfig, DetectorOutput};
use crate::detectors::flags::FraudFlags;
use crate::graph::NodeKind;
use crate::models::{FlagLabel, Severity, TimeClusterFinding};
use chrono::NaiveDate;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct TimeClusterDetector {
    window_days: i64,
}

impl TimeClusterDetector {
    pub fn new() -> Self {
        Self {
            window_days: 30,
        }
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            window_days: config.get_option_in("window_days", 30, 1..=3650),
        }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Largest number of sorted dates within `window_days` of a starting date
    fn max_in_window(sorted: &[NaiveDate], window_days: i64) -> usize {
        let mut best = 0;
        let mut end = 0;
        for start in 0..sorted.len() {
            end = end.max(start);
            while end < sorted.len() && (sorted[end] - sorted[start]).num_days() <= window_days {
                end += 1;
            }
            best = best.max(end - start);
        }
        best
    }
}

impl Default for TimeClusterDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for TimeClusterDetector {
    fn name(&self) -> &'static str {
        "TimeClusterDetector"
    }

    fn description(&self) -> &'static str {
        "Detects people involved in multiple accidents within a short time window"
    }

    fn label(&self) -> FlagLabel {
        FlagLabel::TimeCluster
    }

    fn detect(&self, ctx: &DetectionContext<'_>, flags: &mut FraudFlags) -> DetectorOutput {
        let mut findings = Vec::new();
        let mut discarded = 0usize;

        for (&name, nodes) in &ctx.index.person_to_nodes {
            let mut dates: Vec<NaiveDate> = Vec::new();
            for node in nodes.iter().filter(|n| n.kind == NodeKind::Participant) {
                let Some(person) = node.person_info() else {
                    continue;
                };
                for raw in &person.enter {
                    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                        Ok(date) => dates.push(date),
                        Err(_) => discarded += 1,
                    }
                }
            }
            dates.sort_unstable();

            let in_window = Self::max_in_window(&dates, self.window_days);
            if in_window < 2 {
                continue;
            }

            let severity = if in_window == 2 {
                Severity::Medium
            } else {
                Severity::High
            };
            findings.push(TimeClusterFinding {
                name: name.to_string(),
                kind: FlagLabel::TimeCluster,
                accidents_in_window: in_window,
                window_days: self.window_days,
                severity,
                details: format!("{} accidents within {} days", in_window, self.window_days),
            });
            flags.raise(name, FlagLabel::TimeCluster);
        }

        if discarded > 0 {
            debug!("Time clustering skipped {} unparseable dates", discarded);
        }

        DetectorOutput::TimePatterns(findings)
    }
}
