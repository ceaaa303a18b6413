//! Detector output types

use std::fmt;

use serde::{Deserialize, Serialize};

/// The structural pattern a ring was detected as
///
/// The declaration order is the canonical aggregation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Cycle,
    SmurfFanIn,
    SmurfFanOut,
    ShellChain,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Cycle => "cycle",
            PatternType::SmurfFanIn => "smurf_fan_in",
            PatternType::SmurfFanOut => "smurf_fan_out",
            PatternType::ShellChain => "shell_chain",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which detector produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    Cycles,
    Smurfing,
    ShellChains,
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorKind::Cycles => write!(f, "cycles"),
            DetectorKind::Smurfing => write!(f, "smurfing"),
            DetectorKind::ShellChains => write!(f, "shell chains"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    /// The search budget ran out before the graph was fully explored
    BudgetExhausted,
    /// More rings qualified than the configured cap allows
    CapExceeded,
}

/// A ring as emitted by a detector, before it receives a ring id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedRing {
    pub pattern_type: PatternType,
    pub member_accounts: Vec<String>,
    pub risk_score: f64,
    pub total_amount: f64,
    /// Transaction ids that justify the ring
    pub evidence: Vec<String>,
}

impl DetectedRing {
    /// Label attached to member accounts, e.g. `cycle_length_3`
    pub fn pattern_tag(&self) -> String {
        match self.pattern_type {
            PatternType::Cycle => format!("cycle_length_{}", self.member_accounts.len()),
            PatternType::SmurfFanIn => "smurfing_fan_in".to_string(),
            PatternType::SmurfFanOut => "smurfing_fan_out".to_string(),
            PatternType::ShellChain => "shell_chain".to_string(),
        }
    }
}

/// How one detector run went
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorSummary {
    pub detector: DetectorKind,
    pub rings_found: usize,
    pub truncated: bool,
    pub reasons: Vec<TruncationReason>,
    /// Search steps spent (paths extended or nodes examined)
    pub explored: u64,
}

impl DetectorSummary {
    pub(crate) fn new(
        detector: DetectorKind,
        rings_found: usize,
        mut reasons: Vec<TruncationReason>,
        explored: u64,
    ) -> Self {
        reasons.sort();
        reasons.dedup();
        Self {
            detector,
            rings_found,
            truncated: !reasons.is_empty(),
            reasons,
            explored,
        }
    }
}
