use std::collections::{HashMap, HashSet};
use std::time::Duration;

use petgraph::graph::NodeIndex;

use super::budget::SearchBudget;
use super::scc::strongly_connected_components;
use super::types::{DetectedRing, DetectorKind, DetectorSummary, PatternType, TruncationReason};
use super::PatternDetector;
use crate::config::{DetectionConfig, ScoringConfig};
use crate::constants::detection::CYCLE_MIN_LEN;
use crate::graph::TransactionGraph;
use crate::utils::score::{clamp_score, round2, saturating_bonus};

/// Detector for circular fund routing
///
/// Uses Tarjan's Strongly Connected Components algorithm to restrict the
/// search to mutually reachable accounts, then enumerates every simple cycle
/// whose length lies within the configured bounds.
pub struct CycleDetector {
    min_len: usize,
    max_len: usize,
    path_budget: u64,
    time_budget: Option<Duration>,
    scoring: ScoringConfig,
    rings: Vec<DetectedRing>,
    truncated: bool,
    explored: u64,
}

type Adjacency = HashMap<NodeIndex, Vec<NodeIndex>>;

impl CycleDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            min_len: config.cycle_min_len,
            max_len: config.cycle_max_len,
            path_budget: config.cycle_path_budget,
            time_budget: config.detector_time_budget_ms.map(Duration::from_millis),
            scoring: config.scoring.clone(),
            rings: Vec::new(),
            truncated: false,
            explored: 0,
        }
    }

    /// Check if the last run stopped early
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Walk simple paths from `start`, recording every cycle that closes back
    /// on it; returns `false` when the budget ran out
    fn search(
        &self,
        start: NodeIndex,
        path: &mut Vec<NodeIndex>,
        adjacency: &Adjacency,
        budget: &mut SearchBudget,
        found: &mut CycleCollector<'_>,
    ) -> bool {
        let current = path[path.len() - 1];
        let Some(successors) = adjacency.get(&current) else {
            return true;
        };

        for &next in successors {
            if next == start {
                if path.len() >= self.min_len {
                    found.insert(path);
                }
                continue;
            }
            if path.len() >= self.max_len || path.contains(&next) {
                continue;
            }
            if !budget.consume() {
                return false;
            }

            path.push(next);
            let completed = self.search(start, path, adjacency, budget, found);
            path.pop();

            if !completed {
                return false;
            }
        }

        true
    }

    fn score_cycle(&self, graph: &TransactionGraph, cycle: &[NodeIndex]) -> DetectedRing {
        let mut total_amount = 0.0;
        let mut evidence = Vec::new();
        for (i, &from) in cycle.iter().enumerate() {
            let to = cycle[(i + 1) % cycle.len()];
            for transfer in graph.transfers_between(from, to) {
                total_amount += transfer.amount;
                evidence.push(transfer.transaction_id.clone());
            }
        }

        let s = &self.scoring;
        let length_bonus = cycle.len().saturating_sub(CYCLE_MIN_LEN) as f64 * s.cycle_length_step;
        let volume_factor =
            saturating_bonus(total_amount, s.cycle_volume_bonus, s.cycle_volume_midpoint);
        let risk_score = clamp_score(
            s.cycle_base + length_bonus + volume_factor,
            s.cycle_base,
            s.cycle_ceiling,
        );

        DetectedRing {
            pattern_type: PatternType::Cycle,
            member_accounts: cycle
                .iter()
                .map(|&idx| graph.account(idx).id.clone())
                .collect(),
            risk_score: round2(risk_score),
            total_amount,
            evidence,
        }
    }
}

/// Canonicalizes cycles by rotation and drops the ones already seen
struct CycleCollector<'a> {
    graph: &'a TransactionGraph,
    seen: HashSet<Vec<NodeIndex>>,
    cycles: Vec<Vec<NodeIndex>>,
}

impl<'a> CycleCollector<'a> {
    fn new(graph: &'a TransactionGraph) -> Self {
        Self {
            graph,
            seen: HashSet::new(),
            cycles: Vec::new(),
        }
    }

    /// Rotate `path` to start at its smallest account id and keep it if new
    fn insert(&mut self, path: &[NodeIndex]) {
        let smallest = path
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| self.graph.account(**a).id.cmp(&self.graph.account(**b).id))
            .map_or(0, |(pos, _)| pos);

        let mut canonical = path.to_vec();
        canonical.rotate_left(smallest);

        if self.seen.insert(canonical.clone()) {
            self.cycles.push(canonical);
        }
    }
}

impl PatternDetector for CycleDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Cycles
    }

    fn detect(&mut self, graph: &TransactionGraph) {
        let mut budget = SearchBudget::new(self.path_budget, self.time_budget);
        let mut found = CycleCollector::new(graph);
        let mut truncated = false;

        // Only components with at least two accounts can hold a cycle
        'components: for component in strongly_connected_components(graph)
            .into_iter()
            .filter(|c| c.len() >= 2)
        {
            let members: HashSet<NodeIndex> = component.iter().copied().collect();
            let adjacency: Adjacency = component
                .iter()
                .map(|&idx| {
                    let inside: Vec<NodeIndex> = graph
                        .successors(idx)
                        .into_iter()
                        .filter(|next| members.contains(next))
                        .collect();
                    (idx, inside)
                })
                .collect();

            for &start in &component {
                let mut path = vec![start];
                if !self.search(start, &mut path, &adjacency, &mut budget, &mut found) {
                    truncated = true;
                    break 'components;
                }
            }
        }

        let mut cycles = found.cycles;
        cycles.sort_by_cached_key(|cycle| {
            cycle
                .iter()
                .map(|&idx| graph.account(idx).id.clone())
                .collect::<Vec<_>>()
        });

        self.rings = cycles
            .iter()
            .map(|cycle| self.score_cycle(graph, cycle))
            .collect();
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
        DetectorSummary::new(DetectorKind::Cycles, self.rings.len(), reasons, self.explored)
    }
}
