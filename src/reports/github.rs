//! GitHub Actions format report generation

use std::fmt::Write;

use super::ReportGenerator;
use crate::engine::AnalysisResult;
use crate::error::MuleRadarError;
use crate::utils::string::{format_amount, pluralize};

pub struct GitHubReportGenerator;

impl Default for GitHubReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for GitHubReportGenerator {
    fn generate_report(&self, result: &AnalysisResult) -> Result<String, MuleRadarError> {
        let mut output = String::new();

        for summary in result.detectors().iter().filter(|d| d.truncated) {
            writeln!(
                output,
                "::warning title=Partial Results::{} detection was truncated",
                summary.detector
            )?;
        }

        if !result.has_rings() {
            writeln!(
                output,
                "::notice title=Transaction Scan::No laundering patterns detected ✅"
            )?;
            return Ok(output);
        }

        writeln!(
            output,
            "::error title=Fraud Rings::Found {} fraud {} involving {} {}",
            result.ring_count(),
            pluralize("ring", result.ring_count()),
            result.suspicious_accounts().count(),
            pluralize("account", result.suspicious_accounts().count())
        )?;

        for ring in result.rings() {
            writeln!(
                output,
                "::warning title={} {}::risk {:.2}, volume {}: {}",
                ring.ring_id,
                ring.pattern_tag,
                ring.risk_score,
                format_amount(ring.total_amount),
                ring.member_accounts.join(" → ")
            )?;
        }

        Ok(output)
    }
}
