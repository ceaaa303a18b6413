//! # Ring Aggregation Module
//!
//! Merges the rings from every detector into one canonically ordered list,
//! assigns `RING_001`-style identifiers and folds ring memberships into a
//! per-account suspicion score.
//!
//! The fold is a pure function of the ordered ring list: each account starts
//! at zero and, for every ring it belongs to, gains `risk_score ×
//! membership_weight`, clamped to the suspicion ceiling after each step.

mod types;

use std::collections::{BTreeSet, HashMap};

pub use types::{FraudRing, ScoredAccount};

use crate::config::ScoringConfig;
use crate::constants::output::RING_ID_PREFIX;
use crate::detector::DetectedRing;
use crate::graph::TransactionGraph;
use crate::utils::score::round2;

pub struct RingAggregator {
    membership_weight: f64,
    suspicion_ceiling: f64,
}

/// Running state for one account during the fold
#[derive(Default)]
struct Accumulator {
    score: f64,
    patterns: BTreeSet<String>,
    ring_ids: Vec<String>,
}

impl RingAggregator {
    pub fn new(scoring: &ScoringConfig) -> Self {
        Self {
            membership_weight: scoring.membership_weight,
            suspicion_ceiling: scoring.suspicion_ceiling,
        }
    }

    /// Order and number `rings`, then score every account of `graph`
    ///
    /// Rings are stably sorted into cycle, fan-in, fan-out, shell chain
    /// order, so each detector's own ordering is kept within its group.
    /// Accounts come back sorted by score descending, then id ascending.
    pub fn aggregate(
        &self,
        graph: &TransactionGraph,
        mut rings: Vec<DetectedRing>,
    ) -> (Vec<FraudRing>, Vec<ScoredAccount>) {
        rings.sort_by_key(|ring| ring.pattern_type);

        let rings: Vec<FraudRing> = rings
            .into_iter()
            .enumerate()
            .map(|(i, ring)| FraudRing {
                ring_id: format!("{RING_ID_PREFIX}{:03}", i + 1),
                pattern_type: ring.pattern_type,
                pattern_tag: ring.pattern_tag(),
                member_accounts: ring.member_accounts,
                risk_score: ring.risk_score,
                total_amount: ring.total_amount,
                evidence: ring.evidence,
            })
            .collect();

        let mut state: HashMap<&str, Accumulator> = HashMap::new();
        for ring in &rings {
            let contribution = ring.risk_score * self.membership_weight;
            for member in &ring.member_accounts {
                let entry = state.entry(member.as_str()).or_default();
                // An account listed twice in one ring still counts once
                if entry.ring_ids.last() == Some(&ring.ring_id) {
                    continue;
                }
                entry.score = (entry.score + contribution).min(self.suspicion_ceiling);
                entry.patterns.insert(ring.pattern_tag.clone());
                entry.ring_ids.push(ring.ring_id.clone());
            }
        }

        let mut accounts: Vec<ScoredAccount> = graph
            .accounts()
            .map(|(_, account)| {
                let folded = state.remove(account.id.as_str()).unwrap_or_default();
                ScoredAccount {
                    account_id: account.id.clone(),
                    suspicion_score: round2(folded.score),
                    detected_patterns: folded.patterns,
                    ring_ids: folded.ring_ids,
                    transaction_count: account.transaction_count(),
                    total_in: account.total_in,
                    total_out: account.total_out,
                    explanation: None,
                }
            })
            .collect();

        accounts.sort_by(|a, b| {
            b.suspicion_score
                .total_cmp(&a.suspicion_score)
                .then_with(|| a.account_id.cmp(&b.account_id))
        });

        (rings, accounts)
    }
}
