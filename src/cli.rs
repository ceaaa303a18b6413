use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::common::{CommonArgs, DetectionArgs, FormatArgs, RingDisplayArgs};

#[derive(Parser)]
#[command(
    name = "mule-radar",
    about = "📡 Detect money-laundering rings in transaction networks",
    long_about = "mule-radar builds a directed graph from transaction records and searches it \
                  for circular fund routing, smurfing hubs and shell-account relay chains. \
                  Every account is scored from the rings it belongs to.",
    subcommand_required = true,
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan transaction files for laundering rings
    ///
    /// Loads every CSV file found under the given paths, runs the cycle,
    /// smurfing and shell chain detectors and prints the rings and the most
    /// suspicious accounts.
    #[command(
        long_about = "Scan transaction datasets for structural laundering patterns. Each CSV \
                      file needs sender_id, receiver_id, amount and timestamp columns \
                      (transaction_id is optional). Malformed rows are skipped up to the \
                      configured tolerance. Cycles are found with Tarjan's strongly connected \
                      components followed by a bounded simple-cycle search."
    )]
    Scan {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        format: FormatArgs,

        #[command(flatten)]
        ring_display: RingDisplayArgs,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Exit with error code if any ring is found
        #[arg(long, env = "MULE_RADAR_FAIL_ON_RINGS")]
        fail_on_rings: bool,

        /// Include accounts that belong to no ring in JSON output
        #[arg(long, env = "MULE_RADAR_ALL_ACCOUNTS")]
        all_accounts: bool,
    },

    /// Export the transaction graph for visualization
    ///
    /// Writes accounts and merged transfers, with suspicion flags from a
    /// full scan, as JSON, Graphviz DOT or Mermaid.
    #[command(
        long_about = "Export the analyzed transaction graph. Nodes carry the suspicion flag, \
                      the first detected pattern and the transaction count; transfers between \
                      the same pair of accounts are merged into one edge with a total amount \
                      and a count."
    )]
    Graph {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Graph format
        #[arg(
            short,
            long,
            value_enum,
            default_value = crate::constants::output::DEFAULT_GRAPH_FORMAT,
            env = "MULE_RADAR_GRAPH_FORMAT"
        )]
        format: GraphFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long, env = "MULE_RADAR_OUTPUT")]
        output: Option<PathBuf>,

        /// Only draw suspicious accounts (DOT and Mermaid)
        #[arg(long, env = "MULE_RADAR_SUSPICIOUS_ONLY")]
        suspicious_only: bool,
    },

    /// Export evidence packets for the most suspicious accounts
    ///
    /// Produces one JSON packet per account with its score, patterns, rings
    /// and supporting transaction ids, ready for a narrative writer.
    Evidence {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Number of accounts to export (defaults to narrative_top_n)
        #[arg(long, env = "MULE_RADAR_TOP")]
        top: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(short, long, env = "MULE_RADAR_OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "github")]
    GitHub,
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum GraphFormat {
    Json,
    Dot,
    Mermaid,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_with_overrides() {
        let cli = Cli::try_parse_from([
            "mule-radar",
            "scan",
            "data/",
            "--format",
            "json",
            "--smurf-threshold",
            "5",
            "--sequential",
            "--fail-on-rings",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan {
                common,
                format,
                detection,
                fail_on_rings,
                ..
            } => {
                assert_eq!(common.paths, vec![PathBuf::from("data/")]);
                assert_eq!(format.format, OutputFormat::Json);
                assert_eq!(detection.smurf_threshold, Some(5));
                assert!(detection.sequential);
                assert!(fail_on_rings);
            }
            _ => panic!("Expected scan command"),
        }
    }

    #[test]
    fn test_parse_graph_defaults_to_json() {
        let cli = Cli::try_parse_from(["mule-radar", "graph", "tx.csv"]).unwrap();
        match cli.command {
            Commands::Graph { format, output, .. } => {
                assert_eq!(format, GraphFormat::Json);
                assert!(output.is_none());
            }
            _ => panic!("Expected graph command"),
        }
    }
}
