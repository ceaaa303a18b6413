//! Graph command configuration

use std::path::PathBuf;

use super::DetectionConfig;
use crate::cli::GraphFormat;
use crate::error::MuleRadarError;

#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub paths: Vec<PathBuf>,
    pub format: GraphFormat,
    pub output: Option<PathBuf>,
    pub suspicious_only: bool,
    pub detection: DetectionConfig,
}

impl GraphOptions {
    pub fn builder() -> GraphOptionsBuilder {
        GraphOptionsBuilder::new()
    }
}

#[derive(Default)]
pub struct GraphOptionsBuilder {
    paths: Option<Vec<PathBuf>>,
    format: Option<GraphFormat>,
    output: Option<Option<PathBuf>>,
    suspicious_only: Option<bool>,
    detection: Option<DetectionConfig>,
}

impl GraphOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn with_format(mut self, format: GraphFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_suspicious_only(mut self, suspicious_only: bool) -> Self {
        self.suspicious_only = Some(suspicious_only);
        self
    }

    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = Some(detection);
        self
    }
}

impl crate::common::ConfigBuilder for GraphOptionsBuilder {
    type Config = GraphOptions;

    fn build(self) -> Result<Self::Config, MuleRadarError> {
        let missing = |field: &str| MuleRadarError::config(format!("Missing required field: {field}"));

        Ok(GraphOptions {
            paths: self.paths.ok_or_else(|| missing("paths"))?,
            format: self.format.ok_or_else(|| missing("format"))?,
            output: self.output.unwrap_or_default(),
            suspicious_only: self.suspicious_only.unwrap_or(false),
            detection: self.detection.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ConfigBuilder;

    #[test]
    fn test_graph_options_requires_format() {
        let result = GraphOptions::builder()
            .with_paths(vec![PathBuf::from(".")])
            .build();
        assert!(matches!(
            result,
            Err(MuleRadarError::ConfigurationError { message }) if message.contains("format")
        ));
    }

    #[test]
    fn test_graph_options_build() {
        let options = GraphOptions::builder()
            .with_paths(vec![PathBuf::from(".")])
            .with_format(GraphFormat::Mermaid)
            .with_output(Some(PathBuf::from("graph.mmd")))
            .with_suspicious_only(true)
            .build()
            .unwrap();

        assert_eq!(options.format, GraphFormat::Mermaid);
        assert_eq!(options.output, Some(PathBuf::from("graph.mmd")));
        assert!(options.suspicious_only);
    }
}
