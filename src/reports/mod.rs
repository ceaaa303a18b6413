//! Report generation modules for different output formats
//!
//! This module contains report generators for various output formats:
//! - human: Human-readable console output
//! - json: JSON format for programmatic use and persistence
//! - github: GitHub Actions annotations for CI runs

pub mod github;
pub mod human;
pub mod json;

use crate::engine::AnalysisResult;
use crate::error::MuleRadarError;

/// Common trait for all report generators
pub trait ReportGenerator {
    /// Generate a report from an analysis result
    fn generate_report(&self, result: &AnalysisResult) -> Result<String, MuleRadarError>;
}

// Re-export for convenience
pub use github::GitHubReportGenerator;
pub use human::HumanReportGenerator;
pub use json::JsonReportGenerator;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::DetectionConfig;
    use crate::engine::{AnalysisEngine, AnalysisResult};
    use crate::graph::TransactionRecord;

    /// A three-account cycle plus an unrelated transfer
    pub fn cycle_result() -> AnalysisResult {
        let records = vec![
            TransactionRecord::new("T1", "ACC_A", "ACC_B", "1000", "2024-01-01 09:00:00"),
            TransactionRecord::new("T2", "ACC_B", "ACC_C", "1000", "2024-01-01 10:00:00"),
            TransactionRecord::new("T3", "ACC_C", "ACC_A", "1000", "2024-01-01 11:00:00"),
            TransactionRecord::new("T4", "ACC_X", "ACC_Y", "20", "2024-01-02 11:00:00"),
        ];
        analyze(&records)
    }

    pub fn clean_result() -> AnalysisResult {
        let records = vec![TransactionRecord::new(
            "T1",
            "ACC_X",
            "ACC_Y",
            "20",
            "2024-01-02 11:00:00",
        )];
        analyze(&records)
    }

    fn analyze(records: &[TransactionRecord]) -> AnalysisResult {
        AnalysisEngine::new(DetectionConfig::default())
            .unwrap()
            .analyze(records)
            .unwrap()
    }
}
