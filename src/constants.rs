//! Configuration constants for mule-radar
//!
//! Every detection default lives here so that `DetectionConfig::default()`,
//! the CLI help text and the tests agree on the same numbers. All of them
//! can be overridden through a TOML configuration file or CLI flags.

use std::time::Duration;

/// Detector thresholds and resource ceilings
pub mod detection {
    /// Distinct counterparts needed before an account counts as a hub
    pub const SMURF_THRESHOLD: usize = 10;

    /// Window in which a hub's transfers count as temporally clustered
    pub const TEMPORAL_WINDOW_HOURS: f64 = 72.0;

    /// An account with at most this many transactions is a shell
    pub const SHELL_MAX_TXN_COUNT: usize = 3;

    /// Maximum number of shell-chain rings kept per run
    pub const SHELL_CHAIN_CAP: usize = 50;

    /// Minimum edges a relay chain needs before it is reported
    pub const SHELL_MIN_EDGES: usize = 3;

    /// Longest relay chain the shell search will follow
    pub const SHELL_MAX_EDGES: usize = 6;

    pub const CYCLE_MIN_LEN: usize = 3;
    pub const CYCLE_MAX_LEN: usize = 5;

    /// Hard ceiling on `cycle_max_len`; enumeration grows exponentially
    pub const CYCLE_LEN_LIMIT: usize = 8;

    /// Hard ceiling on `shell_max_edges`; the chain search recurses once per hop
    pub const SHELL_EDGE_LIMIT: usize = 12;

    /// Fraction of malformed rows tolerated before a dataset is rejected
    pub const MALFORMED_ROW_TOLERANCE: f64 = 0.10;

    /// Accounts handed to the narrative layer
    pub const NARRATIVE_TOP_N: usize = 20;

    pub const CYCLE_PATH_BUDGET: u64 = 1_000_000;
    pub const SHELL_PATH_BUDGET: u64 = 1_000_000;
    pub const SMURF_NODE_BUDGET: u64 = 10_000_000;
}

/// Score ranges and bonuses
pub mod scoring {
    pub const CYCLE_BASE: f64 = 60.0;
    pub const CYCLE_CEILING: f64 = 80.0;
    pub const CYCLE_LENGTH_STEP: f64 = 5.0;
    pub const CYCLE_VOLUME_BONUS: f64 = 10.0;
    /// Cycle volume at which half of the volume bonus is earned
    pub const CYCLE_VOLUME_MIDPOINT: f64 = 10_000.0;

    pub const SMURF_BASE: f64 = 50.0;
    pub const SMURF_CEILING: f64 = 85.0;
    pub const SMURF_WIDTH_STEP: f64 = 2.0;
    pub const SMURF_WIDTH_CAP: f64 = 20.0;
    pub const SMURF_TEMPORAL_BONUS: f64 = 15.0;

    pub const SHELL_BASE: f64 = 50.0;
    pub const SHELL_CEILING: f64 = 75.0;
    pub const SHELL_LENGTH_STEP: f64 = 5.0;
    pub const SHELL_LENGTH_CAP: f64 = 15.0;
    pub const SHELL_SHARED_STEP: f64 = 2.0;
    pub const SHELL_SHARED_CAP: f64 = 10.0;

    /// Share of a ring's risk that each member inherits
    pub const MEMBERSHIP_WEIGHT: f64 = 0.6;

    pub const SUSPICION_CEILING: f64 = 100.0;
}

/// Progress spinner configuration
pub mod progress {
    use super::*;

    /// Duration between progress bar updates
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Spinner frames for the radar sweep animation
    pub const SPINNER_FRAMES: &[&str] = &["◜ ", "◠ ", "◝ ", "◞ ", "◡ ", "◟ "];
}

/// Output formatting configuration
pub mod output {
    /// Default report format when not specified
    pub const DEFAULT_FORMAT: &str = "human";

    /// Default graph export format when not specified
    pub const DEFAULT_GRAPH_FORMAT: &str = "json";

    /// Prefix of ring identifiers, followed by a zero-padded sequence
    pub const RING_ID_PREFIX: &str = "RING_";

    /// Prefix of synthesized transaction ids for records without one
    pub const TXN_ID_PREFIX: &str = "TXN_";
}
