//! claimgraph - fraud-ring detection over insurance claim graphs
//!
//! Loads a graph of accidents, cars and the people around them, runs a set
//! of heuristic detectors and aggregates their flags into ranked leads.
//!
//! ```no_run
//! use claimgraph::config::ProjectConfig;
//! use claimgraph::graph::load_graph;
//! use claimgraph::pipeline::analyze;
//! use std::path::Path;
//!
//! let graph = load_graph(Path::new("insurance-fraud-data.json"))?;
//! let report = analyze(&graph, &ProjectConfig::default())?;
//! println!("{} suspicious entities", report.summary.suspicious_entities);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod detectors;
pub mod graph;
pub mod models;
pub mod pipeline;
pub mod reporters;
