//! Evidence command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::EvidenceConfig;
use crate::error::MuleRadarError;

impl FromCommand for EvidenceConfig {
    fn from_command(command: Commands) -> Result<Self, MuleRadarError> {
        match command {
            Commands::Evidence {
                common,
                detection,
                top,
                output,
            } => EvidenceConfig::builder()
                .with_paths(common.get_paths())
                .with_top(top)
                .with_output(output)
                .with_detection(detection.resolve(common.config.as_ref())?)
                .build(),
            _ => Err(MuleRadarError::config(
                "Invalid command type for EvidenceConfig",
            )),
        }
    }
}

crate::impl_try_from_command!(EvidenceConfig);

/// Execute the evidence command
pub fn execute_evidence_command(command: Commands) -> Result<()> {
    let config = EvidenceConfig::from_command(command)
        .wrap_err("Failed to parse evidence command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::evidence::EvidenceExecutor;
    EvidenceExecutor::execute(config)
}
