use std::collections::BTreeSet;

use serde::Serialize;

use crate::aggregator::{FraudRing, ScoredAccount};
use crate::detector::{DetectorKind, DetectorSummary, PatternType};
use crate::graph::{GraphMetadata, SkippedRecord};

/// Immutable outcome of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    metadata: GraphMetadata,
    rings: Vec<FraudRing>,
    accounts: Vec<ScoredAccount>,
    detectors: Vec<DetectorSummary>,
    skipped_records: Vec<SkippedRecord>,
    processing_time_ms: u64,
}

/// A ring as seen from one of its member accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingEvidence {
    pub ring_id: String,
    pub pattern_type: PatternType,
    pub risk_score: f64,
    pub member_accounts: Vec<String>,
}

/// Everything a narrative writer needs to explain one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidencePacket {
    pub account_id: String,
    pub suspicion_score: f64,
    pub detected_patterns: BTreeSet<String>,
    pub rings: Vec<RingEvidence>,
    /// Evidence transactions of every ring the account is in, deduplicated
    pub transaction_ids: Vec<String>,
    pub explanation: Option<String>,
}

impl AnalysisResult {
    pub(crate) fn new(
        metadata: GraphMetadata,
        rings: Vec<FraudRing>,
        accounts: Vec<ScoredAccount>,
        detectors: Vec<DetectorSummary>,
        skipped_records: Vec<SkippedRecord>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            metadata,
            rings,
            accounts,
            detectors,
            skipped_records,
            processing_time_ms,
        }
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    /// Rings in ring id order
    pub fn rings(&self) -> &[FraudRing] {
        &self.rings
    }

    pub fn ring(&self, ring_id: &str) -> Option<&FraudRing> {
        self.rings.iter().find(|r| r.ring_id == ring_id)
    }

    pub fn has_rings(&self) -> bool {
        !self.rings.is_empty()
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Every account of the graph, by score descending then id
    pub fn accounts(&self) -> &[ScoredAccount] {
        &self.accounts
    }

    pub fn account(&self, account_id: &str) -> Option<&ScoredAccount> {
        self.accounts.iter().find(|a| a.account_id == account_id)
    }

    /// Accounts that belong to at least one ring
    pub fn suspicious_accounts(&self) -> impl Iterator<Item = &ScoredAccount> {
        self.accounts.iter().filter(|a| a.is_suspicious())
    }

    pub fn detectors(&self) -> &[DetectorSummary] {
        &self.detectors
    }

    pub fn detector(&self, kind: DetectorKind) -> Option<&DetectorSummary> {
        self.detectors.iter().find(|d| d.detector == kind)
    }

    /// Whether any detector stopped early or dropped rings
    pub fn is_truncated(&self) -> bool {
        self.detectors.iter().any(|d| d.truncated)
    }

    pub fn skipped_records(&self) -> &[SkippedRecord] {
        &self.skipped_records
    }

    pub fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }

    /// Evidence packets for the `top_n` most suspicious accounts
    pub fn evidence(&self, top_n: usize) -> Vec<EvidencePacket> {
        self.suspicious_accounts()
            .take(top_n)
            .map(|account| {
                let rings: Vec<&FraudRing> = account
                    .ring_ids
                    .iter()
                    .filter_map(|id| self.ring(id))
                    .collect();

                let mut seen = BTreeSet::new();
                let transaction_ids = rings
                    .iter()
                    .flat_map(|ring| ring.evidence.iter())
                    .filter(|id| seen.insert(id.as_str()))
                    .cloned()
                    .collect();

                EvidencePacket {
                    account_id: account.account_id.clone(),
                    suspicion_score: account.suspicion_score,
                    detected_patterns: account.detected_patterns.clone(),
                    rings: rings
                        .iter()
                        .map(|ring| RingEvidence {
                            ring_id: ring.ring_id.clone(),
                            pattern_type: ring.pattern_type,
                            risk_score: ring.risk_score,
                            member_accounts: ring.member_accounts.clone(),
                        })
                        .collect(),
                    transaction_ids,
                    explanation: account.explanation.clone(),
                }
            })
            .collect()
    }
}
