//! Command implementations for the mule-radar CLI
//!
//! This module contains the implementations for each CLI command:
//! - scan: Report fraud rings and the most suspicious accounts
//! - graph: Export the transaction graph with suspicion flags
//! - evidence: Export evidence packets for narrative generation

pub mod evidence;
pub mod graph;
pub mod scan;

use miette::Result;

use crate::cli::Commands;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Scan { .. } => scan::execute_scan_command(command),
        Commands::Graph { .. } => graph::execute_graph_command(command),
        Commands::Evidence { .. } => evidence::execute_evidence_command(command),
    }
}
