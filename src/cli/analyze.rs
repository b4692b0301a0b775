//! Analyze command implementation
//!
//! Runs the full detection pipeline over the input graph:
//! 1. Resolve config and load the claim graph
//! 2. Run every enabled detector
//! 3. Save the JSON results document
//! 4. Print the sectioned report (or the document itself)

use super::{Cli, DEFAULT_OUTPUT};
use crate::pipeline::Pipeline;
use crate::reporters::{self, OutputFormat};

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::info;

/// Where the results document goes
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Destination::Stdout
        } else {
            Destination::File(path.to_path_buf())
        }
    }
}

/// Run the analyze command
pub fn run(cli: &Cli, output: Option<&Path>, format: Option<&str>) -> Result<()> {
    let start = Instant::now();
    let session = cli.open_session()?;
    let config = session.config;

    let destination = output
        .map(Path::to_path_buf)
        .or_else(|| config.defaults.output.as_ref().map(PathBuf::from))
        .map(|p| Destination::from_path(&p))
        .unwrap_or_else(|| Destination::File(PathBuf::from(DEFAULT_OUTPUT)));

    let format = match format.or(config.defaults.format.as_deref()) {
        Some(f) => OutputFormat::from_str(f)?,
        None => OutputFormat::Text,
    };

    eprintln!(
        "{}Analyzing {} ({} nodes, {} edges)",
        style("▶ ").bold(),
        style(session.input.display()).cyan(),
        session.graph.node_count(),
        session.graph.edge_count()
    );

    let pipeline = Pipeline::new(config).with_progress_callback(Box::new(
        |name: &str, done: usize, total: usize| {
            info!("[{}/{}] {} finished", done, total, name);
        },
    ));
    let report = pipeline.run(&session.graph)?;

    let document = reporters::report_with_format(&report, OutputFormat::Json)?;

    match &destination {
        Destination::Stdout => {
            println!("{}", document);
        }
        Destination::File(path) => {
            let console_output = reporters::report_with_format(&report, format)?;
            println!("{}", console_output);

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, &document)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            eprintln!(
                "{}Results saved to {}",
                style("✓ ").green(),
                style(path.display()).cyan()
            );
        }
    }

    eprintln!(
        "{}{} suspicious entities, {} high-value leads in {:.2}s",
        style("✨ ").bold(),
        style(report.summary.suspicious_entities).bold(),
        style(report.summary.high_value_leads).bold(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
