//! Aggregated result types

use std::collections::BTreeSet;

use serde::Serialize;

use crate::detector::PatternType;

/// A detected ring after it has been given its run-wide identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudRing {
    pub ring_id: String,
    pub pattern_type: PatternType,
    /// Tag attached to member accounts, e.g. `cycle_length_4`
    pub pattern_tag: String,
    pub member_accounts: Vec<String>,
    pub risk_score: f64,
    pub total_amount: f64,
    pub evidence: Vec<String>,
}

impl FraudRing {
    pub fn contains(&self, account_id: &str) -> bool {
        self.member_accounts.iter().any(|m| m == account_id)
    }
}

/// Per-account suspicion folded from ring memberships
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAccount {
    pub account_id: String,
    pub suspicion_score: f64,
    pub detected_patterns: BTreeSet<String>,
    /// Rings the account belongs to, in ring id order
    pub ring_ids: Vec<String>,
    pub transaction_count: usize,
    pub total_in: f64,
    pub total_out: f64,
    /// Filled in by a narrative layer; never set by the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl ScoredAccount {
    pub fn is_suspicious(&self) -> bool {
        self.suspicion_score > 0.0
    }
}
