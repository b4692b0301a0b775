//! CLI command definitions and handlers

pub(crate) mod analyze;
mod entity;
mod init;
mod search;

use crate::config::{load_config_file, load_project_config, ProjectConfig, ThresholdValue};
use crate::graph::{load_graph, ClaimGraph};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Input graph read when neither the CLI nor the config names one
pub const DEFAULT_INPUT: &str = "insurance-fraud-data.json";
/// Results document written when neither the CLI nor the config names one
pub const DEFAULT_OUTPUT: &str = "fraud_detection_results.json";

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse and validate a time window in days (1-3650)
fn parse_window_days(s: &str) -> Result<i64, String> {
    let n: i64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of days", s))?;
    if !(1..=3650).contains(&n) {
        Err("window must be between 1 and 3650 days".to_string())
    } else {
        Ok(n)
    }
}

/// claimgraph - fraud-ring detection over insurance claim graphs
#[derive(Parser, Debug)]
#[command(name = "claimgraph")]
#[command(
    version,
    about = "Detect fraud-ring patterns in an insurance claim graph",
    long_about = "claimgraph reads a graph of accidents, cars, participants, witnesses, \
doctors and lawyers, runs a set of heuristic detectors over it and reports the \
entities that trip several fraud indicators at once.\n\n\
Run without a subcommand to analyze insurance-fraud-data.json in the current directory.",
    after_help = "\
Examples:
  claimgraph                                   Analyze with default paths
  claimgraph --input claims.json analyze -f json   JSON document on stdout too
  claimgraph --window-days 14 analyze          Tighter time-cluster window
  claimgraph --professionals analyze           Also flag doctors/lawyers
  claimgraph search smith                      Find entities by name
  claimgraph entity \"JOHN SMITH\"               Inspect one entity's connections"
)]
pub struct Cli {
    /// Claim graph JSON file (default: insurance-fraud-data.json)
    #[arg(long, short = 'i', global = true)]
    pub input: Option<PathBuf>,

    /// Config file (default: claimgraph.toml next to the input)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Run detectors one after another on the calling thread
    #[arg(long, global = true)]
    pub sequential: bool,

    /// Time-cluster window in days
    #[arg(long, global = true, value_parser = parse_window_days)]
    pub window_days: Option<i64>,

    /// Also run the suspicious-professional detector
    #[arg(long, global = true)]
    pub professionals: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example claimgraph.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run every enabled detector and save the results document
    #[command(after_help = "\
Examples:
  claimgraph analyze                           Text report, results saved to fraud_detection_results.json
  claimgraph analyze --format json             Print the JSON document as well
  claimgraph analyze --output -                JSON document to stdout only")]
    Analyze {
        /// Results file, or '-' for stdout (default: fraud_detection_results.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// What to print: text (sectioned report) or json (results document)
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,
    },

    /// Find entities whose name, label or id contains a term
    Search {
        /// Case-insensitive search term
        term: String,

        /// Maximum hits to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show one entity's flags and connections
    Entity {
        /// Name (or part of it), case-insensitive
        name: String,

        /// Connections listed per direction
        #[arg(long, default_value = "10")]
        connections: usize,
    },
}

/// Config, input path and graph shared by the analysis commands
pub(crate) struct Session {
    pub config: ProjectConfig,
    pub input: PathBuf,
    pub graph: ClaimGraph,
}

impl Cli {
    /// Resolve the config file, apply CLI overrides and load the input graph
    pub(crate) fn open_session(&self) -> Result<Session> {
        let config = self.resolve_config()?;
        let input = self
            .input
            .clone()
            .or_else(|| config.defaults.input.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

        let graph = load_graph(&input)
            .with_context(|| format!("Failed to load claim graph from {}", input.display()))?;

        Ok(Session {
            config,
            input,
            graph,
        })
    }

    fn resolve_config(&self) -> Result<ProjectConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => load_project_config(&config_dir(self.input.as_deref())),
        };
        self.apply_overrides(&mut config);
        debug!("Effective config: {:?}", config);
        Ok(config)
    }

    /// CLI flags win over file values
    fn apply_overrides(&self, config: &mut ProjectConfig) {
        if let Some(workers) = self.workers {
            config.engine.workers = workers;
        }
        if self.sequential {
            config.engine.parallel = false;
        }
        if let Some(days) = self.window_days {
            config.set_threshold(
                "TimeClusterDetector",
                "window_days",
                ThresholdValue::Integer(days),
            );
        }
        if self.professionals {
            config.set_enabled("SuspiciousProfessionalDetector", true);
        }
    }
}

/// Directory searched for a project config
fn config_dir(input: Option<&Path>) -> PathBuf {
    input
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Init { dir, force }) => init::run(dir, *force),

        Some(Commands::Analyze { output, format }) => {
            analyze::run(&cli, output.as_deref(), format.as_deref())
        }

        Some(Commands::Search { term, limit }) => search::run(&cli, term, *limit),

        Some(Commands::Entity { name, connections }) => entity::run(&cli, name, *connections),

        // Default: analyze with configured or built-in paths
        None => analyze::run(&cli, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::DetectorConfig;

    #[test]
    fn test_bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["claimgraph"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "warn");
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "claimgraph",
            "analyze",
            "--input",
            "claims.json",
            "--window-days",
            "14",
            "--sequential",
            "-f",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.input, Some(PathBuf::from("claims.json")));
        assert_eq!(cli.window_days, Some(14));
        assert!(cli.sequential);
        match cli.command {
            Some(Commands::Analyze { format, .. }) => assert_eq!(format.as_deref(), Some("json")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["claimgraph", "--workers", "0"]).is_err());
        assert!(Cli::try_parse_from(["claimgraph", "--window-days", "-3"]).is_err());
        assert!(Cli::try_parse_from(["claimgraph", "analyze", "-f", "sarif"]).is_err());
    }

    #[test]
    fn test_overrides_applied_to_config() {
        let cli = Cli::try_parse_from([
            "claimgraph",
            "--workers",
            "3",
            "--window-days",
            "7",
            "--professionals",
            "--sequential",
        ])
        .expect("parse");
        let mut config = ProjectConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.engine.workers, 3);
        assert!(!config.engine.parallel);
        assert_eq!(
            DetectorConfig::from_project_config(&config, "time-cluster")
                .get_option::<i64>("window_days"),
            Some(7)
        );
        assert!(config.is_detector_enabled("SuspiciousProfessionalDetector", false));
    }

    #[test]
    fn test_config_dir_from_input() {
        assert_eq!(config_dir(None), PathBuf::from("."));
        assert_eq!(config_dir(Some(Path::new("claims.json"))), PathBuf::from("."));
        assert_eq!(
            config_dir(Some(Path::new("data/claims.json"))),
            PathBuf::from("data")
        );
    }
}
