//! Command executors that handle the actual logic for each command

pub mod evidence;
pub mod graph;
pub mod scan;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::config::DetectionConfig;
use crate::engine::{AnalysisEngine, AnalysisResult};
use crate::graph::TransactionGraph;
use crate::loader::DatasetLoader;
use crate::progress::ProgressReporter;

/// Trait for command executors
pub trait CommandExecutor {
    type Config;

    /// Execute the command with the given configuration
    fn execute(config: Self::Config) -> Result<()>;
}

/// Load the dataset under `paths`, build the graph and run every detector
pub(crate) fn analyze_paths(
    paths: &[PathBuf],
    detection: DetectionConfig,
) -> Result<(TransactionGraph, AnalysisResult)> {
    let engine = AnalysisEngine::new(detection).wrap_err("Invalid detection configuration")?;

    // Create progress reporter if we're in an interactive terminal
    let mut progress = ProgressReporter::for_terminal();

    let dataset = DatasetLoader::new()
        .load(paths, progress.as_mut())
        .wrap_err("Failed to load transaction data")?;

    if let Some(p) = progress.as_mut() {
        p.start_graph_building();
    }
    let graph = TransactionGraph::from_rows(&dataset.rows, engine.config().malformed_row_tolerance)
        .wrap_err("Failed to build transaction graph")?;
    if let Some(p) = progress.as_mut() {
        p.finish_graph_building(&graph.metadata());
        p.start_detection();
    }

    let result = engine.analyze_graph(&graph);
    if let Some(p) = progress.as_mut() {
        p.finish_detection(result.ring_count(), result.is_truncated());
    }

    Ok((graph, result))
}

/// Writer for `output`, or stdout when none is given
pub(crate) fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => Ok(Box::new(BufWriter::new(
            File::create(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to create output file '{}'", path.display()))?,
        ))),
        None => Ok(Box::new(io::stdout())),
    }
}

pub(crate) fn report_written(output: Option<&Path>, what: &str) {
    if let Some(path) = output {
        eprintln!(
            "{} {} written to {}",
            style("✓").green(),
            what,
            style(path.display()).bold()
        );
    }
}
