//! Evidence command configuration

use std::path::PathBuf;

use super::DetectionConfig;
use crate::error::MuleRadarError;

#[derive(Debug, Clone)]
pub struct EvidenceConfig {
    pub paths: Vec<PathBuf>,
    /// Accounts to export; falls back to `detection.narrative_top_n`
    pub top: Option<usize>,
    pub output: Option<PathBuf>,
    pub detection: DetectionConfig,
}

impl EvidenceConfig {
    pub fn builder() -> EvidenceConfigBuilder {
        EvidenceConfigBuilder::new()
    }

    /// Number of packets to export
    pub fn top_n(&self) -> usize {
        self.top.unwrap_or(self.detection.narrative_top_n)
    }
}

#[derive(Default)]
pub struct EvidenceConfigBuilder {
    paths: Option<Vec<PathBuf>>,
    top: Option<Option<usize>>,
    output: Option<Option<PathBuf>>,
    detection: Option<DetectionConfig>,
}

impl EvidenceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn with_top(mut self, top: Option<usize>) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = Some(detection);
        self
    }
}

impl crate::common::ConfigBuilder for EvidenceConfigBuilder {
    type Config = EvidenceConfig;

    fn build(self) -> Result<Self::Config, MuleRadarError> {
        let paths = self
            .paths
            .ok_or_else(|| MuleRadarError::config("Missing required field: paths"))?;
        let top = self.top.unwrap_or_default();
        if top == Some(0) {
            return Err(MuleRadarError::config("--top must be at least 1"));
        }

        Ok(EvidenceConfig {
            paths,
            top,
            output: self.output.unwrap_or_default(),
            detection: self.detection.unwrap_or_default(),
        })
    }
}
