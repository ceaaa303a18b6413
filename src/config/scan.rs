//! Scan command configuration

use std::path::PathBuf;

use super::DetectionConfig;
use crate::cli::OutputFormat;
use crate::error::MuleRadarError;

/// Configuration for the scan command
///
/// Holds the input locations, how the report is rendered and the detection
/// settings resolved from the configuration file and flags.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// CSV files or directories to load
    pub paths: Vec<PathBuf>,
    /// Output format for the report
    pub format: OutputFormat,
    /// Maximum number of rings to print (None = all)
    pub max_rings: Option<usize>,
    /// Whether to exit with error code if rings are found
    pub fail_on_rings: bool,
    /// List zero-score accounts in JSON output as well
    pub all_accounts: bool,
    pub detection: DetectionConfig,
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct ScanConfigBuilder {
    paths: Option<Vec<PathBuf>>,
    format: Option<OutputFormat>,
    max_rings: Option<Option<usize>>,
    fail_on_rings: Option<bool>,
    all_accounts: Option<bool>,
    detection: Option<DetectionConfig>,
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_max_rings(mut self, max_rings: Option<usize>) -> Self {
        self.max_rings = Some(max_rings);
        self
    }

    pub fn with_fail_on_rings(mut self, fail_on_rings: bool) -> Self {
        self.fail_on_rings = Some(fail_on_rings);
        self
    }

    pub fn with_all_accounts(mut self, all_accounts: bool) -> Self {
        self.all_accounts = Some(all_accounts);
        self
    }

    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = Some(detection);
        self
    }
}

impl crate::common::ConfigBuilder for ScanConfigBuilder {
    type Config = ScanConfig;

    fn build(self) -> Result<Self::Config, MuleRadarError> {
        let missing = |field: &str| MuleRadarError::config(format!("Missing required field: {field}"));

        Ok(ScanConfig {
            paths: self.paths.ok_or_else(|| missing("paths"))?,
            format: self.format.ok_or_else(|| missing("format"))?,
            max_rings: self.max_rings.unwrap_or_default(),
            fail_on_rings: self.fail_on_rings.unwrap_or(false),
            all_accounts: self.all_accounts.unwrap_or(false),
            detection: self.detection.unwrap_or_default(),
        })
    }
}
