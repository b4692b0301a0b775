//! Project-level configuration support
//!
//! Loads per-dataset configuration from `claimgraph.toml` or
//! `.claimgraphrc.json` next to the input file.
//!
//! # Configuration Format
//!
//! ```toml
//! # claimgraph.toml
//!
//! [detectors.time-cluster]
//! thresholds = { window_days = 14 }
//!
//! [detectors.statistical-outlier]
//! thresholds = { iqr_multiplier = 2.0 }
//!
//! [detectors.suspicious-professional]
//! enabled = true
//! thresholds = { min_clients = 3 }
//!
//! [engine]
//! parallel = true
//! workers = 4
//!
//! [report]
//! lead_min_indicators = 2
//! top_leads = 10
//!
//! [defaults]
//! input = "insurance-fraud-data.json"
//! output = "fraud_detection_results.json"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// File names searched, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["claimgraph.toml", ".claimgraphrc.json"];

/// Project-level configuration loaded from claimgraph.toml or similar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Per-detector configuration overrides
    #[serde(default)]
    pub detectors: HashMap<String, DetectorConfigOverride>,

    /// Detector execution settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Lead ranking settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Configuration override for a specific detector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorConfigOverride {
    /// Whether the detector runs; unset means the detector's own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Detector-specific threshold overrides
    /// Keys depend on the detector (e.g., window_days, iqr_multiplier)
    #[serde(default)]
    pub thresholds: HashMap<String, ThresholdValue>,
}

/// A threshold value can be an integer, float, or boolean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl ThresholdValue {
    /// Convert to the JSON value detectors read their options from
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ThresholdValue::Integer(v) => serde_json::Value::from(*v),
            ThresholdValue::Float(v) => serde_json::Value::from(*v),
            ThresholdValue::Boolean(v) => serde_json::Value::from(*v),
            ThresholdValue::String(v) => serde_json::Value::from(v.as_str()),
        }
    }
}

/// How the detector engine runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run independent detectors on a thread pool (default: true)
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Worker threads, 0 = auto-detect
    #[serde(default)]
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            workers: 0,
        }
    }
}

fn default_parallel() -> bool {
    true
}

/// Lead ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Distinct indicators an entity needs to count as a high-value lead
    #[serde(default = "default_lead_min_indicators")]
    pub lead_min_indicators: usize,

    /// Leads listed in the report
    #[serde(default = "default_top_leads")]
    pub top_leads: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            lead_min_indicators: default_lead_min_indicators(),
            top_leads: default_top_leads(),
        }
    }
}

fn default_lead_min_indicators() -> usize {
    2
}
fn default_top_leads() -> usize {
    10
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliDefaults {
    /// Default input graph file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Default results file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Default output format (json, text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Load project configuration from the directory holding the input file.
///
/// Searches for configuration files in this order:
/// 1. `claimgraph.toml`
/// 2. `.claimgraphrc.json`
///
/// A file that fails to parse is reported and skipped. Returns default
/// configuration if no usable config file is found.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load one config file, picking the format from its extension
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let config = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    Ok(config)
}

impl ProjectConfig {
    /// Override block for a detector, by normalized or literal name
    pub fn detector_override(&self, name: &str) -> Option<&DetectorConfigOverride> {
        let normalized = normalize_detector_name(name);

        self.detectors
            .get(&normalized)
            .or_else(|| self.detectors.get(name))
            .or_else(|| {
                self.detectors
                    .iter()
                    .find(|(k, _)| normalize_detector_name(k) == normalized)
                    .map(|(_, v)| v)
            })
    }

    /// Check if a detector is enabled, falling back to `default` when the
    /// config does not say
    pub fn is_detector_enabled(&self, name: &str, default: bool) -> bool {
        self.detector_override(name)
            .and_then(|c| c.enabled)
            .unwrap_or(default)
    }

    /// Force a detector on or off
    pub fn set_enabled(&mut self, detector_name: &str, enabled: bool) {
        self.override_entry(detector_name).enabled = Some(enabled);
    }

    /// Set a threshold, replacing any configured value
    pub fn set_threshold(&mut self, detector_name: &str, threshold_name: &str, value: ThresholdValue) {
        self.override_entry(detector_name)
            .thresholds
            .insert(threshold_name.to_string(), value);
    }

    fn override_entry(&mut self, detector_name: &str) -> &mut DetectorConfigOverride {
        let normalized = normalize_detector_name(detector_name);
        // Fold entries spelled differently into the normalized key first
        if !self.detectors.contains_key(&normalized) {
            let spelled: Option<String> = self
                .detectors
                .keys()
                .find(|k| normalize_detector_name(k) == normalized)
                .cloned();
            let existing = spelled
                .and_then(|k| self.detectors.remove(&k))
                .unwrap_or_default();
            self.detectors.insert(normalized.clone(), existing);
        }
        self.detectors.entry(normalized).or_default()
    }
}

/// Normalize detector name for config lookup
/// Converts various formats to kebab-case for matching
pub fn normalize_detector_name(name: &str) -> String {
    // TimeClusterDetector -> time-cluster
    // time_cluster -> time-cluster
    // time-cluster -> time-cluster

    let mut result = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            // Hyphen before a word start: camelCase boundary or the end of an acronym
            let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
            let is_acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && i + 1 < chars.len()
                && chars[i + 1].is_lowercase();

            if prev_is_lower || is_acronym_end {
                result.push('-');
            }
            result.push(c.to_lowercase().next().unwrap_or(*c));
        } else if *c == '_' {
            result.push('-');
        } else {
            result.push(*c);
        }
    }

    // Remove common suffixes
    result.trim_end_matches("-detector").to_string()
}
