//! Fraud-pattern detectors
//!
//! This module provides the detector framework and the heuristics that
//! look for fraud-ring patterns in a claim graph.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DetectorEngine                          │
//! │  - Registers detectors                                      │
//! │  - Runs independent detectors in parallel (rayon)           │
//! │  - Merges their flags in registration order                 │
//! │  - Runs dependent detectors against the merged flags        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Detector Trait                         │
//! │  - name(): Unique identifier                                │
//! │  - label(): Flag recorded against implicated entities       │
//! │  - detect(ctx, flags): Run detection, return findings       │
//! │  - is_dependent(): Whether it reads other detectors' flags  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Detectors
//!
//! - `StatisticalOutlierDetector` - Participants in unusually many accidents
//! - `TimeClusterDetector` - Several accidents within a short window
//! - `RepeatedCarDetector` - Vehicles involved in multiple accidents
//! - `RepeatedWitnessDetector` - Witnesses present at multiple accidents
//! - `RoleSwitchingDetector` - Driver in one accident, passenger in another
//! - `SuspiciousProfessionalDetector` - Doctors/lawyers with flagged clients
//!   (dependent, disabled unless configured)
//!
//! # Usage
//!
//! ```ignore
//! use claimgraph::detectors::{DetectionContext, DetectorEngineBuilder, TimeClusterDetector};
//! use claimgraph::graph::GraphIndex;
//! use std::sync::Arc;
//!
//! let index = GraphIndex::build(&graph);
//! let engine = DetectorEngineBuilder::new()
//!     .workers(4)
//!     .detector(Arc::new(TimeClusterDetector::new()))
//!     .build();
//!
//! let outcome = engine.run(&DetectionContext::new(&graph, &index))?;
//! ```

mod base;
mod engine;
mod flags;
mod repeated_car;
mod repeated_witness;
mod role_switching;
mod statistical_outlier;
mod suspicious_professional;
mod time_cluster;

// Re-export base types
pub use base::{
    DetectionContext, DetectionSummary, Detector, DetectorConfig, DetectorOutput, DetectorResult,
    ProgressCallback,
};

// Re-export engine
pub use engine::{DetectionOutcome, DetectorEngine, DetectorEngineBuilder};

pub use flags::FraudFlags;

pub use repeated_car::RepeatedCarDetector;
pub use repeated_witness::RepeatedWitnessDetector;
pub use role_switching::RoleSwitchingDetector;
pub use statistical_outlier::StatisticalOutlierDetector;
pub use suspicious_professional::SuspiciousProfessionalDetector;
pub use time_cluster::TimeClusterDetector;

use crate::config::ProjectConfig;
use std::sync::Arc;

/// Every known detector, configured from `project`, in reporting order
pub fn all_detectors(project: &ProjectConfig) -> Vec<Arc<dyn Detector>> {
    let cfg = |name: &str| DetectorConfig::from_project_config(project, name);
    vec![
        Arc::new(StatisticalOutlierDetector::with_config(cfg(
            "StatisticalOutlierDetector",
        ))),
        Arc::new(TimeClusterDetector::with_config(cfg("TimeClusterDetector"))),
        Arc::new(RepeatedCarDetector::with_config(cfg("RepeatedCarDetector"))),
        Arc::new(RepeatedWitnessDetector::with_config(cfg(
            "RepeatedWitnessDetector",
        ))),
        Arc::new(RoleSwitchingDetector::new()),
        Arc::new(SuspiciousProfessionalDetector::with_config(cfg(
            "SuspiciousProfessionalDetector",
        ))),
    ]
}

/// Detectors enabled for this project
///
/// The five core heuristics run unless disabled; opt-in detectors run only
/// when the config enables them.
pub fn default_detectors(project: &ProjectConfig) -> Vec<Arc<dyn Detector>> {
    all_detectors(project)
        .into_iter()
        .filter(|d| project.is_detector_enabled(d.name(), d.enabled_by_default()))
        .collect()
}
