//! # Mule Radar - Detect Money-Mule Rings in Transaction Networks
//!
//! Mule Radar turns a list of account-to-account transfers into a directed
//! transaction graph and searches it for the structural fingerprints of
//! money laundering: funds routed in a circle, many accounts funnelling into
//! or out of one hub, and relays through low-activity shell accounts. Every
//! pattern becomes a scored fraud ring, and every account is scored from the
//! rings it belongs to.
//!
//! ## Main Components
//!
//! - **Loader**: Reads CSV transaction files, matching columns by header
//! - **Graph**: Validates records and builds the transaction multigraph
//! - **Detector**: Cycle, smurfing and shell chain detectors with search
//!   budgets
//! - **Aggregator**: Assigns ring ids and derives account suspicion scores
//! - **Engine**: Runs the pipeline, with the detectors in parallel
//! - **Reports**: Human, JSON and GitHub Actions reports plus graph exports
//!
//! ## Usage
//!
//! ### Example: Scanning a Transaction Export
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use mule_radar::config::DetectionConfig;
//! use mule_radar::engine::AnalysisEngine;
//! use mule_radar::graph::TransactionGraph;
//! use mule_radar::loader::DatasetLoader;
//! use mule_radar::reports::{HumanReportGenerator, JsonReportGenerator, ReportGenerator};
//! use miette::IntoDiagnostic;
//!
//! # fn main() -> miette::Result<()> {
//! // Step 1: Read every CSV file under the export directory
//! let dataset = DatasetLoader::new().load(&[PathBuf::from("exports/")], None)?;
//! println!("Read {} rows from {} files", dataset.row_count(), dataset.files.len());
//!
//! // Step 2: Build the transaction graph, tolerating a few malformed rows
//! let engine = AnalysisEngine::new(DetectionConfig::default())?;
//! let graph = TransactionGraph::from_rows(&dataset.rows, engine.config().malformed_row_tolerance)?;
//!
//! // Step 3: Run the detectors and score accounts
//! let result = engine.analyze_graph(&graph);
//!
//! // Step 4: Generate reports
//! if result.has_rings() {
//!     println!("⚠️  Found {} fraud rings!", result.ring_count());
//!
//!     // Human-readable report for console output
//!     let human_report = HumanReportGenerator::new(Some(5)); // show max 5 rings
//!     println!("{}", human_report.generate_report(&result)?);
//!
//!     // JSON report for downstream tooling
//!     let json_output = JsonReportGenerator::new().generate_report(&result)?;
//!     std::fs::write("rings.json", json_output).into_diagnostic()?;
//! } else {
//!     println!("✅ No laundering patterns found!");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Example: Scoring In-Memory Records
//!
//! ```
//! use mule_radar::config::DetectionConfig;
//! use mule_radar::engine::AnalysisEngine;
//! use mule_radar::graph::TransactionRecord;
//!
//! # fn main() -> Result<(), mule_radar::error::MuleRadarError> {
//! let mut records = Vec::new();
//! for i in 0..10 {
//!     records.push(TransactionRecord::new(
//!         &format!("F{i}"),
//!         &format!("SENDER_{i:02}"),
//!         "COLLECTOR",
//!         "950.00",
//!         &format!("2024-03-01 10:{:02}:00", i * 5),
//!     ));
//! }
//!
//! let engine = AnalysisEngine::new(DetectionConfig::default())?;
//! let result = engine.analyze(&records)?;
//!
//! let ring = &result.rings()[0];
//! assert_eq!(ring.pattern_tag, "smurfing_fan_in");
//! assert_eq!(ring.member_accounts[0], "COLLECTOR");
//! assert_eq!(ring.risk_score, 65.0);
//! # Ok(())
//! # }
//! ```
//!
//! ### Example: Exporting the Graph
//!
//! ```no_run
//! # use mule_radar::config::DetectionConfig;
//! # use mule_radar::engine::AnalysisEngine;
//! # use mule_radar::graph::TransactionGraph;
//! use mule_radar::graph::{GraphPayload, GraphRenderer};
//! use miette::IntoDiagnostic;
//!
//! # fn main() -> miette::Result<()> {
//! # let engine = AnalysisEngine::new(DetectionConfig::default())?;
//! # let graph = TransactionGraph::from_records(&[], 0.1)?;
//! # let result = engine.analyze_graph(&graph);
//! let payload = GraphPayload::build(&graph, &result);
//!
//! // Only the suspicious part of the network, as a Mermaid diagram
//! let mut mermaid_output = Vec::new();
//! GraphRenderer::new(true).render_mermaid(&payload, &mut mermaid_output)?;
//! std::fs::write("rings.mmd", mermaid_output).into_diagnostic()?;
//! # Ok(())
//! # }
//! ```

// Private modules
mod constants;
mod progress;
mod utils;

// Public modules
pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod executors;
pub mod graph;
pub mod loader;
pub mod reports;

// Main entry point for the library
pub fn run() -> miette::Result<()> {
    use clap::Parser;

    use crate::cli::Cli;
    use crate::commands::execute_command;

    let cli = Cli::parse();
    execute_command(cli.command)
}
