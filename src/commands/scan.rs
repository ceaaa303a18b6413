//! Scan command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::ScanConfig;
use crate::error::MuleRadarError;

impl FromCommand for ScanConfig {
    fn from_command(command: Commands) -> Result<Self, MuleRadarError> {
        match command {
            Commands::Scan {
                common,
                format,
                ring_display,
                detection,
                fail_on_rings,
                all_accounts,
            } => ScanConfig::builder()
                .with_paths(common.get_paths())
                .with_format(format.format)
                .with_max_rings(ring_display.max_rings)
                .with_fail_on_rings(fail_on_rings)
                .with_all_accounts(all_accounts)
                .with_detection(detection.resolve(common.config.as_ref())?)
                .build(),
            _ => Err(MuleRadarError::config(
                "Invalid command type for ScanConfig",
            )),
        }
    }
}

crate::impl_try_from_command!(ScanConfig);

/// Execute the scan command
pub fn execute_scan_command(command: Commands) -> Result<()> {
    let config =
        ScanConfig::from_command(command).wrap_err("Failed to parse scan command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::scan::ScanExecutor;
    ScanExecutor::execute(config)
}
