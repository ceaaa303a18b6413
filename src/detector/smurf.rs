use std::time::Duration;

use petgraph::Direction;
use petgraph::graph::NodeIndex;

use super::PatternDetector;
use super::budget::SearchBudget;
use super::types::{DetectedRing, DetectorKind, DetectorSummary, PatternType, TruncationReason};
use crate::config::{DetectionConfig, ScoringConfig};
use crate::graph::TransactionGraph;
use crate::utils::score::{clamp_score, round2};

/// Detector for structuring hubs
///
/// An account that receives from (fan-in) or sends to (fan-out) at least
/// `smurf_threshold` distinct counterparts forms a ring with them. Hubs whose
/// contributing transfers all fall inside the temporal window score higher.
pub struct SmurfDetector {
    threshold: usize,
    window_hours: f64,
    node_budget: u64,
    time_budget: Option<Duration>,
    scoring: ScoringConfig,
    rings: Vec<DetectedRing>,
    truncated: bool,
    explored: u64,
}

impl SmurfDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            threshold: config.smurf_threshold,
            window_hours: config.temporal_window_hours,
            node_budget: config.smurf_node_budget,
            time_budget: config.detector_time_budget_ms.map(Duration::from_millis),
            scoring: config.scoring.clone(),
            rings: Vec::new(),
            truncated: false,
            explored: 0,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Build the ring for `hub` in one direction if it has enough counterparts
    fn hub_ring(
        &self,
        graph: &TransactionGraph,
        hub: NodeIndex,
        direction: Direction,
    ) -> Option<DetectedRing> {
        let counterparts = match direction {
            Direction::Incoming => graph.predecessors(hub),
            Direction::Outgoing => graph.successors(hub),
        };
        if counterparts.len() < self.threshold {
            return None;
        }

        let transfers = graph.transfers(hub, direction);
        let total_amount = transfers.iter().map(|t| t.amount).sum();
        let evidence = transfers.iter().map(|t| t.transaction_id.clone()).collect();

        // Transfers come back sorted by timestamp
        let clustered = match (transfers.first(), transfers.last()) {
            (Some(first), Some(last)) => {
                let span_hours =
                    (last.timestamp - first.timestamp).num_milliseconds() as f64 / 3_600_000.0;
                span_hours <= self.window_hours
            }
            _ => false,
        };

        let s = &self.scoring;
        let width_bonus = ((counterparts.len() - self.threshold) as f64 * s.smurf_width_step)
            .min(s.smurf_width_cap);
        let temporal_bonus = if clustered { s.smurf_temporal_bonus } else { 0.0 };
        let risk_score = clamp_score(
            s.smurf_base + width_bonus + temporal_bonus,
            s.smurf_base,
            s.smurf_ceiling,
        );

        let pattern_type = match direction {
            Direction::Incoming => PatternType::SmurfFanIn,
            Direction::Outgoing => PatternType::SmurfFanOut,
        };

        let mut member_accounts = Vec::with_capacity(counterparts.len() + 1);
        member_accounts.push(graph.account(hub).id.clone());
        member_accounts.extend(counterparts.iter().map(|&c| graph.account(c).id.clone()));

        Some(DetectedRing {
            pattern_type,
            member_accounts,
            risk_score: round2(risk_score),
            total_amount,
            evidence,
        })
    }
}

impl PatternDetector for SmurfDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Smurfing
    }

    fn detect(&mut self, graph: &TransactionGraph) {
        let mut budget = SearchBudget::new(self.node_budget, self.time_budget);
        let mut hubs: Vec<NodeIndex> = graph.graph().node_indices().collect();
        hubs.sort_by(|a, b| graph.account(*a).id.cmp(&graph.account(*b).id));

        let mut fan_in = Vec::new();
        let mut fan_out = Vec::new();
        let mut truncated = false;

        for hub in hubs {
            if !budget.consume() {
                truncated = true;
                break;
            }
            fan_in.extend(self.hub_ring(graph, hub, Direction::Incoming));
            fan_out.extend(self.hub_ring(graph, hub, Direction::Outgoing));
        }

        fan_in.append(&mut fan_out);
        self.rings = fan_in;
        self.truncated = truncated;
        self.explored = budget.used();
    }

    fn rings(&self) -> &[DetectedRing] {
        &self.rings
    }

    fn summary(&self) -> DetectorSummary {
        let reasons = if self.truncated {
            vec![TruncationReason::BudgetExhausted]
        } else {
            Vec::new()
        };
        DetectorSummary::new(DetectorKind::Smurfing, self.rings.len(), reasons, self.explored)
    }
}
