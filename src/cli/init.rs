//! Init command - write an example claimgraph.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub(crate) const CONFIG_TEMPLATE: &str = r#"# claimgraph configuration
#
# Values here override built-in defaults; command-line flags override both.

[defaults]
# Claim graph read when --input is not given
input = "insurance-fraud-data.json"
# Results document written by `analyze`
output = "fraud_detection_results.json"
# Console format for `analyze` (text, json)
format = "text"

[engine]
# Run independent detectors on a thread pool
parallel = true
# Worker threads (0 = one per core, up to 16)
workers = 0

[report]
# Indicators an entity needs to count as a high-value lead
lead_min_indicators = 2
# Leads listed in the report
top_leads = 10

# Per-detector switches and thresholds. Names are matched loosely:
# "time-cluster", "time_cluster" and "TimeClusterDetector" are the same.

[detectors.statistical-outlier]
enabled = true
thresholds = { iqr_multiplier = 1.5, min_sample = 4 }

[detectors.time-cluster]
enabled = true
thresholds = { window_days = 30 }

[detectors.repeated-car]
enabled = true
thresholds = { min_accidents = 2 }

[detectors.repeated-witness]
enabled = true
thresholds = { min_accidents = 2 }

[detectors.role-switching]
enabled = true

# Doctors and lawyers serving several flagged clients
[detectors.suspicious-professional]
enabled = false
thresholds = { min_clients = 2 }
"#;

/// Run the init command
pub fn run(dir: &Path, force: bool) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join("claimgraph.toml");
    if config_path.exists() && !force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Run analysis", style("claimgraph analyze").cyan());
    println!("  {} Look up a person", style("claimgraph entity <name>").cyan());

    Ok(())
}
