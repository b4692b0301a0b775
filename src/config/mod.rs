//! Configuration module for claimgraph
//!
//! This module handles:
//! - Project-level configuration (claimgraph.toml)
//! - Detector enablement and threshold overrides
//! - Engine and lead-ranking settings
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, normalize_detector_name, CliDefaults,
    DetectorConfigOverride, EngineConfig, ProjectConfig, ReportConfig, ThresholdValue,
    CONFIG_FILE_NAMES,
};
