//! Evidence command executor

use std::io::Write;

use console::style;
use miette::{Result, WrapErr};

use crate::config::EvidenceConfig;
use crate::error::MuleRadarError;
use crate::executors::{CommandExecutor, analyze_paths, output_writer, report_written};

pub struct EvidenceExecutor;

impl CommandExecutor for EvidenceExecutor {
    type Config = EvidenceConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let top_n = config.top_n();
        eprintln!(
            "{} Collecting evidence for the top {} accounts...",
            style("🔎").cyan(),
            style(top_n).yellow()
        );

        let (_graph, result) = analyze_paths(&config.paths, config.detection.clone())?;
        let packets = result.evidence(top_n);

        let mut writer = output_writer(config.output.as_deref())?;
        serde_json::to_writer_pretty(&mut writer, &packets)
            .map_err(MuleRadarError::Json)
            .wrap_err("Failed to serialize evidence packets")?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .map_err(MuleRadarError::Io)
            .wrap_err("Failed to write evidence packets")?;

        report_written(config.output.as_deref(), "Evidence");
        Ok(())
    }
}
