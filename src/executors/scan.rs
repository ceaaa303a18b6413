//! Scan command executor

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::cli::OutputFormat;
use crate::config::ScanConfig;
use crate::executors::{CommandExecutor, analyze_paths};
use crate::reports::{
    GitHubReportGenerator, HumanReportGenerator, JsonReportGenerator, ReportGenerator,
};

pub struct ScanExecutor;

impl CommandExecutor for ScanExecutor {
    type Config = ScanConfig;

    fn execute(config: Self::Config) -> Result<()> {
        eprintln!(
            "{} Scanning transactions for laundering rings...\n",
            style("📡").cyan()
        );
        eprintln!(
            "  {} Smurfing threshold: {} counterparts within {}h",
            style("→").dim(),
            style(config.detection.smurf_threshold).yellow(),
            config.detection.temporal_window_hours
        );
        eprintln!(
            "  {} Cycle lengths: {}..={}",
            style("→").dim(),
            config.detection.cycle_min_len,
            config.detection.cycle_max_len
        );
        eprintln!(
            "  {} Shell accounts: at most {} transactions",
            style("→").dim(),
            config.detection.shell_max_txn_count
        );

        let (_graph, result) = analyze_paths(&config.paths, config.detection.clone())?;

        // Generate report based on format
        let report_result = match config.format {
            OutputFormat::Human => {
                let generator = HumanReportGenerator::new(config.max_rings);
                generator.generate_report(&result)
            }
            OutputFormat::Json => {
                let generator = if config.all_accounts {
                    JsonReportGenerator::with_all_accounts()
                } else {
                    JsonReportGenerator::new()
                };
                generator.generate_report(&result)
            }
            OutputFormat::GitHub => {
                let generator = GitHubReportGenerator::new();
                generator.generate_report(&result)
            }
        };

        match report_result {
            Ok(report) => print!("{report}"),
            Err(e) => {
                return Err(e)
                    .into_diagnostic()
                    .wrap_err("Failed to generate report");
            }
        }

        // Exit with error code if rings found and requested
        if config.fail_on_rings && result.has_rings() {
            std::process::exit(1);
        }

        Ok(())
    }
}
