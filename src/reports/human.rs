//! Human-readable console report generation

use std::fmt::Write;

use console::style;

use super::ReportGenerator;
use crate::detector::TruncationReason;
use crate::engine::AnalysisResult;
use crate::error::MuleRadarError;
use crate::utils::string::{format_amount, pluralize};

/// How many accounts the summary table lists
const TOP_ACCOUNTS: usize = 10;

pub struct HumanReportGenerator {
    max_rings: Option<usize>,
}

impl HumanReportGenerator {
    pub fn new(max_rings: Option<usize>) -> Self {
        Self { max_rings }
    }
}

impl ReportGenerator for HumanReportGenerator {
    fn generate_report(&self, result: &AnalysisResult) -> Result<String, MuleRadarError> {
        let mut output = String::new();
        let metadata = result.metadata();

        writeln!(
            output,
            "\n{} Analyzed {} {} and {} {} ({} total volume) in {} ms",
            style("📊").blue(),
            style(metadata.account_count).bold(),
            pluralize("account", metadata.account_count),
            style(metadata.transaction_count).bold(),
            pluralize("transaction", metadata.transaction_count),
            format_amount(metadata.total_volume),
            result.processing_time_ms()
        )?;

        if !result.skipped_records().is_empty() {
            writeln!(
                output,
                "{} Skipped {} malformed {}:",
                style("⚠").yellow(),
                result.skipped_records().len(),
                pluralize("row", result.skipped_records().len())
            )?;
            for skipped in result.skipped_records().iter().take(5) {
                writeln!(
                    output,
                    "    {} row {}: {}",
                    style("•").dim(),
                    skipped.row,
                    skipped.reason
                )?;
            }
        }

        for summary in result.detectors().iter().filter(|d| d.truncated) {
            let reasons: Vec<&str> = summary
                .reasons
                .iter()
                .map(|reason| match reason {
                    TruncationReason::BudgetExhausted => "search budget exhausted",
                    TruncationReason::CapExceeded => "ring cap exceeded",
                })
                .collect();
            writeln!(
                output,
                "{} {} detection truncated ({})",
                style("⚠").yellow(),
                summary.detector,
                reasons.join(", ")
            )?;
        }

        if !result.has_rings() {
            write!(
                output,
                "\n{} No laundering patterns detected.\n",
                style("✅").green().bold()
            )?;
            return Ok(output);
        }

        write!(
            output,
            "\n{} Found {} fraud {}:\n\n",
            style("🚨").red().bold(),
            style(result.ring_count()).red().bold(),
            pluralize("ring", result.ring_count())
        )?;

        let total_rings = result.ring_count();
        let limit = self.max_rings.unwrap_or(total_rings);

        for ring in result.rings().iter().take(limit) {
            writeln!(
                output,
                "{} {} {} risk {}",
                style("🔗").yellow(),
                style(&ring.ring_id).bold(),
                style(&ring.pattern_tag).cyan(),
                style(format!("{:.2}", ring.risk_score)).red()
            )?;
            writeln!(
                output,
                "    {} {}",
                style("accounts:").dim(),
                ring.member_accounts.join(" → ")
            )?;
            writeln!(
                output,
                "    {} {} across {} {}",
                style("volume:").dim(),
                format_amount(ring.total_amount),
                ring.evidence.len(),
                pluralize("transaction", ring.evidence.len())
            )?;
        }

        if limit < total_rings {
            writeln!(
                output,
                "\n{} Showing {} of {} rings. Use --max-rings to see more.",
                style("ℹ️").blue(),
                style(limit).yellow(),
                style(total_rings).yellow()
            )?;
        }

        writeln!(output, "\n{} Most suspicious accounts:", style("👤").blue())?;
        for account in result.suspicious_accounts().take(TOP_ACCOUNTS) {
            let patterns: Vec<&str> = account.detected_patterns.iter().map(String::as_str).collect();
            writeln!(
                output,
                "    {:>6.2}  {}  {}",
                style(account.suspicion_score).red().bold(),
                style(&account.account_id).bold(),
                style(patterns.join(", ")).dim()
            )?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::{clean_result, cycle_result};

    #[test]
    fn test_clean_report() {
        let report = HumanReportGenerator::new(None)
            .generate_report(&clean_result())
            .unwrap();
        assert!(report.contains("No laundering patterns detected"));
        assert!(report.contains("2 accounts"));
    }

    #[test]
    fn test_ring_report() {
        let report = HumanReportGenerator::new(None)
            .generate_report(&cycle_result())
            .unwrap();
        assert!(report.contains("RING_001"));
        assert!(report.contains("cycle_length_3"));
        assert!(report.contains("ACC_A → ACC_B → ACC_C"));
        assert!(report.contains("3,000.00"));
        assert!(!report.contains("Showing"));
    }

    #[test]
    fn test_max_rings_limits_output() {
        let report = HumanReportGenerator::new(Some(0))
            .generate_report(&cycle_result())
            .unwrap();
        assert!(!report.contains("RING_001"));
        assert!(report.contains("Showing 0 of 1 rings"));
    }
}
