//! Graph command executor

use std::io::Write;

use console::style;
use miette::{Result, WrapErr};

use crate::cli::GraphFormat;
use crate::config::GraphOptions;
use crate::executors::{CommandExecutor, analyze_paths, output_writer, report_written};
use crate::graph::{GraphPayload, GraphRenderer};

pub struct GraphExecutor;

impl CommandExecutor for GraphExecutor {
    type Config = GraphOptions;

    fn execute(config: Self::Config) -> Result<()> {
        eprintln!(
            "{} Generating {} transaction graph...",
            style("📊").cyan(),
            format!("{:?}", config.format).to_lowercase()
        );

        let (graph, result) = analyze_paths(&config.paths, config.detection.clone())?;
        let payload = GraphPayload::build(&graph, &result);
        let renderer = GraphRenderer::new(config.suspicious_only);

        let mut writer = output_writer(config.output.as_deref())?;

        // Render based on format
        match config.format {
            GraphFormat::Json => renderer
                .render_json(&payload, writer.as_mut())
                .wrap_err("Failed to render JSON graph")?,
            GraphFormat::Dot => renderer
                .render_dot(&payload, writer.as_mut())
                .wrap_err("Failed to render DOT graph")?,
            GraphFormat::Mermaid => renderer
                .render_mermaid(&payload, writer.as_mut())
                .wrap_err("Failed to render Mermaid graph")?,
        }
        writer
            .flush()
            .map_err(crate::error::MuleRadarError::Io)
            .wrap_err("Failed to write graph")?;

        report_written(config.output.as_deref(), "Graph");
        Ok(())
    }
}
