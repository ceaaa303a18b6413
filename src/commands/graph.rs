//! Graph command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::GraphOptions;
use crate::error::MuleRadarError;

impl FromCommand for GraphOptions {
    fn from_command(command: Commands) -> Result<Self, MuleRadarError> {
        match command {
            Commands::Graph {
                common,
                detection,
                format,
                output,
                suspicious_only,
            } => GraphOptions::builder()
                .with_paths(common.get_paths())
                .with_format(format)
                .with_output(output)
                .with_suspicious_only(suspicious_only)
                .with_detection(detection.resolve(common.config.as_ref())?)
                .build(),
            _ => Err(MuleRadarError::config(
                "Invalid command type for GraphOptions",
            )),
        }
    }
}

crate::impl_try_from_command!(GraphOptions);

/// Execute the graph command for exporting the transaction graph
pub fn execute_graph_command(command: Commands) -> Result<()> {
    let config = GraphOptions::from_command(command)
        .wrap_err("Failed to parse graph command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::graph::GraphExecutor;
    GraphExecutor::execute(config)
}
