//! Common functionality shared across commands

use std::path::PathBuf;

use clap::Args;

use crate::config::{DetectionConfig, DetectionConfigBuilder};
use crate::error::MuleRadarError;

/// Common arguments shared by multiple commands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// CSV files or directories to scan (defaults to current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// TOML file with detection settings
    #[arg(short, long, value_name = "FILE", env = "MULE_RADAR_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Common output format arguments
#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = crate::constants::output::DEFAULT_FORMAT, env = "MULE_RADAR_FORMAT")]
    pub format: crate::cli::OutputFormat,
}

/// Common ring display arguments
#[derive(Args, Debug, Clone)]
pub struct RingDisplayArgs {
    /// Maximum number of rings to display (shows all by default)
    #[arg(long, env = "MULE_RADAR_MAX_RINGS")]
    pub max_rings: Option<usize>,
}

/// Detection settings that override the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct DetectionArgs {
    /// Distinct counterparts that make an account a smurfing hub
    #[arg(long, env = "MULE_RADAR_SMURF_THRESHOLD")]
    pub smurf_threshold: Option<usize>,

    /// Window in hours within which clustered transfers earn a bonus
    #[arg(long, env = "MULE_RADAR_TEMPORAL_WINDOW_HOURS")]
    pub temporal_window_hours: Option<f64>,

    /// Highest transaction count of a shell account
    #[arg(long, env = "MULE_RADAR_SHELL_MAX_TXN_COUNT")]
    pub shell_max_txn_count: Option<usize>,

    /// Maximum number of shell chains to keep
    #[arg(long, env = "MULE_RADAR_SHELL_CHAIN_CAP")]
    pub shell_chain_cap: Option<usize>,

    /// Shortest cycle to report
    #[arg(long, env = "MULE_RADAR_CYCLE_MIN_LEN")]
    pub cycle_min_len: Option<usize>,

    /// Longest cycle to report
    #[arg(long, env = "MULE_RADAR_CYCLE_MAX_LEN")]
    pub cycle_max_len: Option<usize>,

    /// Fraction of malformed rows tolerated before the dataset is rejected
    #[arg(long, env = "MULE_RADAR_MALFORMED_ROW_TOLERANCE")]
    pub malformed_row_tolerance: Option<f64>,

    /// Wall-clock limit per detector in milliseconds
    #[arg(long, env = "MULE_RADAR_DETECTOR_TIME_BUDGET_MS")]
    pub detector_time_budget_ms: Option<u64>,

    /// Run detectors one after another instead of in parallel
    #[arg(long, env = "MULE_RADAR_SEQUENTIAL")]
    pub sequential: bool,
}

impl CommonArgs {
    /// Get paths, using current directory if none provided
    pub fn get_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
        } else {
            self.paths.clone()
        }
    }
}

impl DetectionArgs {
    /// Load the configuration file, if any, then apply the flags on top
    pub fn resolve(&self, config_file: Option<&PathBuf>) -> Result<DetectionConfig, MuleRadarError> {
        let base = match config_file {
            Some(path) => DetectionConfig::from_file(path)?,
            None => DetectionConfig::default(),
        };

        let mut builder = DetectionConfigBuilder::from_config(base.clone());
        if let Some(threshold) = self.smurf_threshold {
            builder = builder.with_smurf_threshold(threshold);
        }
        if let Some(hours) = self.temporal_window_hours {
            builder = builder.with_temporal_window_hours(hours);
        }
        if let Some(count) = self.shell_max_txn_count {
            builder = builder.with_shell_max_txn_count(count);
        }
        if let Some(cap) = self.shell_chain_cap {
            builder = builder.with_shell_chain_cap(cap);
        }
        if self.cycle_min_len.is_some() || self.cycle_max_len.is_some() {
            builder = builder.with_cycle_lengths(
                self.cycle_min_len.unwrap_or(base.cycle_min_len),
                self.cycle_max_len.unwrap_or(base.cycle_max_len),
            );
        }
        if let Some(tolerance) = self.malformed_row_tolerance {
            builder = builder.with_malformed_row_tolerance(tolerance);
        }
        if self.detector_time_budget_ms.is_some() {
            builder = builder.with_detector_time_budget_ms(self.detector_time_budget_ms);
        }
        if self.sequential {
            builder = builder.with_parallel(false);
        }

        builder.build()
    }
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, MuleRadarError>;
}

/// Trait for configurations that can be created from CLI commands
/// This trait simplifies command-to-config conversions
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, MuleRadarError>;
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::MuleRadarError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_common_args_get_paths_empty() {
        let args = CommonArgs {
            paths: vec![],
            config: None,
        };

        let paths = args.get_paths();
        assert_eq!(paths.len(), 1);
        // Should default to current directory
        assert!(paths[0].is_absolute() || paths[0] == std::path::Path::new("."));
    }

    #[test]
    fn test_common_args_get_paths_provided() {
        let args = CommonArgs {
            paths: vec![PathBuf::from("/data/a.csv"), PathBuf::from("/data/b")],
            config: None,
        };
        assert_eq!(args.get_paths(), args.paths);
    }

    #[test]
    fn test_resolve_without_overrides_is_default() {
        let config = DetectionArgs::default().resolve(None).unwrap();
        assert_eq!(config, DetectionConfig::default());
    }

    #[test]
    fn test_flags_override_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radar.toml");
        fs::write(&path, "smurf_threshold = 7\ncycle_max_len = 6\n").unwrap();

        let args = DetectionArgs {
            smurf_threshold: Some(12),
            cycle_min_len: Some(4),
            sequential: true,
            ..DetectionArgs::default()
        };
        let config = args.resolve(Some(&path)).unwrap();

        assert_eq!(config.smurf_threshold, 12);
        assert_eq!(config.cycle_min_len, 4);
        assert_eq!(config.cycle_max_len, 6);
        assert!(!config.parallel);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = DetectionArgs {
            shell_chain_cap: Some(0),
            ..DetectionArgs::default()
        };
        assert!(matches!(
            args.resolve(None),
            Err(MuleRadarError::ConfigurationError { .. })
        ));
    }
}
