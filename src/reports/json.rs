//! JSON format report generation

use serde_json::json;

use super::ReportGenerator;
use crate::engine::AnalysisResult;
use crate::error::MuleRadarError;

pub struct JsonReportGenerator {
    include_all_accounts: bool,
}

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReportGenerator {
    /// Report listing only accounts that belong to a ring
    pub fn new() -> Self {
        Self {
            include_all_accounts: false,
        }
    }

    /// Report listing every account, including those scored zero
    pub fn with_all_accounts() -> Self {
        Self {
            include_all_accounts: true,
        }
    }
}

impl ReportGenerator for JsonReportGenerator {
    fn generate_report(&self, result: &AnalysisResult) -> Result<String, MuleRadarError> {
        let accounts: Vec<_> = if self.include_all_accounts {
            result.accounts().iter().collect()
        } else {
            result.suspicious_accounts().collect()
        };

        let report = json!({
            "summary": {
                "total_accounts_analyzed": result.metadata().account_count,
                "total_transactions": result.metadata().transaction_count,
                "suspicious_accounts_flagged": result.suspicious_accounts().count(),
                "fraud_rings_detected": result.ring_count(),
                "records_skipped": result.metadata().records_skipped,
                "truncated": result.is_truncated(),
                "processing_time_ms": result.processing_time_ms(),
            },
            "fraud_rings": result.rings(),
            "suspicious_accounts": accounts,
            "detectors": result.detectors(),
            "skipped_records": result.skipped_records(),
        });

        serde_json::to_string_pretty(&report).map_err(MuleRadarError::Json)
    }
}
