use std::collections::{HashMap, HashSet};
use std::time::Duration;

use petgraph::graph::NodeIndex;

use super::PatternDetector;
use super::budget::SearchBudget;
use super::types::{DetectedRing, DetectorKind, DetectorSummary, PatternType, TruncationReason};
use crate::config::{DetectionConfig, ScoringConfig};
use crate::graph::TransactionGraph;
use crate::utils::score::{clamp_score, round2};

/// Detector for relay chains through low-activity accounts
///
/// An account is a shell when its total transaction count is at most
/// `shell_max_txn_count`. Chains start at a non-shell account, pass only
/// through shells and end either at a non-shell terminal, at a shell with
/// nowhere left to go, or once `shell_max_edges` hops have been taken.
pub struct ShellChainDetector {
    max_txn_count: usize,
    min_edges: usize,
    max_edges: usize,
    cap: usize,
    path_budget: u64,
    time_budget: Option<Duration>,
    scoring: ScoringConfig,
    rings: Vec<DetectedRing>,
    reasons: Vec<TruncationReason>,
    explored: u64,
}

/// Search state for one detector run
struct ChainSearch<'a> {
    graph: &'a TransactionGraph,
    shells: HashSet<NodeIndex>,
    min_edges: usize,
    max_edges: usize,
    budget: SearchBudget,
    chains: Vec<Vec<NodeIndex>>,
}

impl ChainSearch<'_> {
    fn is_shell(&self, idx: NodeIndex) -> bool {
        self.shells.contains(&idx)
    }

    fn emit(&mut self, path: &[NodeIndex]) {
        if path.len() > self.min_edges {
            self.chains.push(path.to_vec());
        }
    }

    /// Extend `path`, whose last account is a shell; returns `false` once the
    /// budget is spent
    fn extend(&mut self, path: &mut Vec<NodeIndex>) -> bool {
        if path.len() - 1 >= self.max_edges {
            self.emit(path);
            return true;
        }

        let current = path[path.len() - 1];
        let next: Vec<NodeIndex> = self
            .graph
            .successors(current)
            .into_iter()
            .filter(|n| !path.contains(n))
            .collect();

        if next.is_empty() {
            self.emit(path);
            return true;
        }

        for successor in next {
            if !self.budget.consume() {
                return false;
            }
            path.push(successor);
            let completed = if self.is_shell(successor) {
                self.extend(path)
            } else {
                self.emit(path);
                true
            };
            path.pop();

            if !completed {
                return false;
            }
        }

        true
    }
}

impl ShellChainDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            max_txn_count: config.shell_max_txn_count,
            min_edges: config.shell_min_edges,
            max_edges: config.shell_max_edges,
            cap: config.shell_chain_cap,
            path_budget: config.shell_path_budget,
            time_budget: config.detector_time_budget_ms.map(Duration::from_millis),
            scoring: config.scoring.clone(),
            rings: Vec::new(),
            reasons: Vec::new(),
            explored: 0,
        }
    }

    pub fn is_truncated(&self) -> bool {
        !self.reasons.is_empty()
    }

    fn score_chain(
        &self,
        graph: &TransactionGraph,
        chain: &[NodeIndex],
        sharing: usize,
    ) -> DetectedRing {
        let mut total_amount = 0.0;
        let mut evidence = Vec::new();
        for hop in chain.windows(2) {
            for transfer in graph.transfers_between(hop[0], hop[1]) {
                total_amount += transfer.amount;
                evidence.push(transfer.transaction_id.clone());
            }
        }

        let s = &self.scoring;
        let edges = chain.len() - 1;
        let length_bonus = (edges.saturating_sub(self.min_edges) as f64 * s.shell_length_step)
            .min(s.shell_length_cap);
        let shared_bonus = (sharing as f64 * s.shell_shared_step).min(s.shell_shared_cap);
        let risk_score = clamp_score(
            s.shell_base + length_bonus + shared_bonus,
            s.shell_base,
            s.shell_ceiling,
        );

        DetectedRing {
            pattern_type: PatternType::ShellChain,
            member_accounts: chain
                .iter()
                .map(|&idx| graph.account(idx).id.clone())
                .collect(),
            risk_score: round2(risk_score),
            total_amount,
            evidence,
        }
    }
}

/// Drop chains that repeat, or sit inside, a longer chain already kept
fn dedup_chains(mut chains: Vec<Vec<NodeIndex>>) -> Vec<Vec<NodeIndex>> {
    chains.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut covered: HashSet<Vec<NodeIndex>> = HashSet::new();
    let mut kept = Vec::new();
    for chain in chains {
        if covered.contains(&chain) {
            continue;
        }
        for start in 0..chain.len() {
            for end in start + 2..=chain.len() {
                covered.insert(chain[start..end].to_vec());
            }
        }
        kept.push(chain);
    }
    kept
}

/// For each chain, how many other chains share at least one account with it
fn sharing_counts(chains: &[Vec<NodeIndex>]) -> Vec<usize> {
    let mut by_account: HashMap<NodeIndex, Vec<usize>> = HashMap::new();
    for (i, chain) in chains.iter().enumerate() {
        for &account in chain {
            by_account.entry(account).or_default().push(i);
        }
    }

    chains
        .iter()
        .enumerate()
        .map(|(i, chain)| {
            let others: HashSet<usize> = chain
                .iter()
                .flat_map(|account| by_account[account].iter().copied())
                .filter(|&j| j != i)
                .collect();
            others.len()
        })
        .collect()
}

impl PatternDetector for ShellChainDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::ShellChains
    }

    fn detect(&mut self, graph: &TransactionGraph) {
        let shells: HashSet<NodeIndex> = graph
            .accounts()
            .filter(|(_, account)| account.transaction_count() <= self.max_txn_count)
            .map(|(idx, _)| idx)
            .collect();

        let mut sources: Vec<NodeIndex> = graph
            .graph()
            .node_indices()
            .filter(|idx| !shells.contains(idx))
            .collect();
        sources.sort_by(|a, b| graph.account(*a).id.cmp(&graph.account(*b).id));

        let mut search = ChainSearch {
            graph,
            shells,
            min_edges: self.min_edges,
            max_edges: self.max_edges,
            budget: SearchBudget::new(self.path_budget, self.time_budget),
            chains: Vec::new(),
        };

        let mut reasons = Vec::new();
        'sources: for source in sources {
            for first in graph.successors(source) {
                if !search.is_shell(first) {
                    continue;
                }
                if !search.budget.consume() {
                    reasons.push(TruncationReason::BudgetExhausted);
                    break 'sources;
                }
                let mut path = vec![source, first];
                if !search.extend(&mut path) {
                    reasons.push(TruncationReason::BudgetExhausted);
                    break 'sources;
                }
            }
        }

        let chains = dedup_chains(search.chains);
        let sharing = sharing_counts(&chains);

        let mut ranked: Vec<(usize, DetectedRing)> = chains
            .iter()
            .zip(sharing)
            .map(|(chain, shared)| (shared, self.score_chain(graph, chain, shared)))
            .collect();
        ranked.sort_by(|(shared_a, a), (shared_b, b)| {
            b.member_accounts
                .len()
                .cmp(&a.member_accounts.len())
                .then_with(|| shared_b.cmp(shared_a))
                .then_with(|| a.member_accounts.cmp(&b.member_accounts))
        });

        if ranked.len() > self.cap {
            reasons.push(TruncationReason::CapExceeded);
            ranked.truncate(self.cap);
        }

        self.rings = ranked.into_iter().map(|(_, ring)| ring).collect();
        self.reasons = reasons;
        self.explored = search.budget.used();
    }

    fn rings(&self) -> &[DetectedRing] {
        &self.rings
    }

    fn summary(&self) -> DetectorSummary {
        DetectorSummary::new(
            DetectorKind::ShellChains,
            self.rings.len(),
            self.reasons.clone(),
            self.explored,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ConfigBuilder;
    use crate::graph::TransactionRecord;

    fn records_of(edges: &[(&str, &str)]) -> Vec<TransactionRecord> {
        edges
            .iter()
            .enumerate()
            .map(|(i, (from, to))| {
                TransactionRecord::new(&format!("T{i:03}"), from, to, "500", "2024-02-01 08:00:00")
            })
            .collect()
    }

    /// Gives `account` enough unrelated activity to stop being a shell
    fn busy(account: &str, edges: &mut Vec<(String, String)>) {
        for j in 0..3 {
            edges.push((account.to_string(), format!("{account}_F{j}")));
        }
    }

    fn detect_with(config: &DetectionConfig, edges: &[(String, String)]) -> ShellChainDetector {
        let borrowed: Vec<(&str, &str)> = edges
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        let graph = TransactionGraph::from_records(&records_of(&borrowed), 0.0).unwrap();
        let mut detector = ShellChainDetector::new(config);
        detector.detect(&graph);
        detector
    }

    fn detect(edges: &[(String, String)]) -> ShellChainDetector {
        detect_with(&DetectionConfig::default(), edges)
    }

    fn owned(edges: &[(&str, &str)]) -> Vec<(String, String)> {
        edges
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_chain_ending_at_dead_end_shell() {
        let mut edges = owned(&[("X", "S1"), ("S1", "S2"), ("S2", "S3")]);
        busy("X", &mut edges);
        let detector = detect(&edges);

        assert_eq!(detector.ring_count(), 1);
        let ring = &detector.rings()[0];
        assert_eq!(ring.member_accounts, vec!["X", "S1", "S2", "S3"]);
        assert_eq!(ring.pattern_tag(), "shell_chain");
        assert_eq!(ring.risk_score, 50.0);
        assert_eq!(ring.total_amount, 1500.0);
        assert!(!detector.is_truncated());
    }

    #[test]
    fn test_chain_ending_at_busy_terminal() {
        let mut edges = owned(&[("X", "S1"), ("S1", "S2"), ("S2", "Y")]);
        busy("X", &mut edges);
        busy("Y", &mut edges);
        let detector = detect(&edges);

        assert_eq!(detector.ring_count(), 1);
        assert_eq!(detector.rings()[0].member_accounts, vec!["X", "S1", "S2", "Y"]);
    }

    #[test]
    fn test_short_chains_do_not_qualify() {
        let mut edges = owned(&[("X", "S1"), ("S1", "S2")]);
        busy("X", &mut edges);
        assert_eq!(detect(&edges).ring_count(), 0);
    }

    #[test]
    fn test_busy_intermediate_breaks_chain() {
        let mut edges = owned(&[("X", "S1"), ("S1", "M"), ("M", "S2"), ("S2", "S3")]);
        busy("X", &mut edges);
        busy("M", &mut edges);

        // M ends the first chain after two hops and starts a two-hop chain
        assert_eq!(detect(&edges).ring_count(), 0);
    }

    #[test]
    fn test_chains_stop_at_max_edges() {
        let names = ["S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8"];
        let mut edges = vec![("X".to_string(), names[0].to_string())];
        for pair in names.windows(2) {
            edges.push((pair[0].to_string(), pair[1].to_string()));
        }
        busy("X", &mut edges);
        let detector = detect(&edges);

        assert_eq!(detector.ring_count(), 1);
        let ring = &detector.rings()[0];
        assert_eq!(ring.member_accounts.len(), 7);
        // 50 + min(15, 3 * 5)
        assert_eq!(ring.risk_score, 65.0);
    }

    #[test]
    fn test_dedup_removes_contained_windows() {
        let n = |i: u32| NodeIndex::new(i as usize);
        let chains = vec![
            vec![n(2), n(3), n(4), n(5)],
            vec![n(1), n(2), n(3), n(4), n(5)],
            vec![n(1), n(2), n(3), n(4), n(5)],
            vec![n(9), n(3), n(4), n(5)],
        ];
        let kept = dedup_chains(chains);
        assert_eq!(
            kept,
            vec![vec![n(1), n(2), n(3), n(4), n(5)], vec![n(9), n(3), n(4), n(5)]]
        );
    }

    #[test]
    fn test_sharing_counts() {
        let n = |i: u32| NodeIndex::new(i as usize);
        let chains = vec![
            vec![n(1), n(2), n(3)],
            vec![n(4), n(2), n(5)],
            vec![n(6), n(7), n(3)],
            vec![n(8), n(9), n(10)],
        ];
        assert_eq!(sharing_counts(&chains), vec![2, 1, 1, 0]);
    }

    #[test]
    fn test_shared_accounts_raise_risk_and_rank() {
        // Two chains meeting in a shared dead-end shell
        let mut edges = owned(&[
            ("X", "A1"),
            ("A1", "A2"),
            ("A2", "Z"),
            ("Y", "B1"),
            ("B1", "B2"),
            ("B2", "Z"),
            ("W", "C1"),
            ("C1", "C2"),
            ("C2", "C3"),
        ]);
        busy("X", &mut edges);
        busy("Y", &mut edges);
        busy("W", &mut edges);
        let detector = detect(&edges);

        let members: Vec<Vec<String>> = detector
            .rings()
            .iter()
            .map(|r| r.member_accounts.clone())
            .collect();
        assert_eq!(
            members,
            vec![
                vec!["X", "A1", "A2", "Z"],
                vec!["Y", "B1", "B2", "Z"],
                vec!["W", "C1", "C2", "C3"],
            ]
        );
        assert_eq!(detector.rings()[0].risk_score, 52.0);
        assert_eq!(detector.rings()[2].risk_score, 50.0);
    }

    #[test]
    fn test_cap_truncates_and_flags() {
        let mut edges = Vec::new();
        for i in 0..60 {
            let source = format!("X{i:02}");
            edges.push((source.clone(), format!("S{i:02}_1")));
            edges.push((format!("S{i:02}_1"), format!("S{i:02}_2")));
            edges.push((format!("S{i:02}_2"), format!("S{i:02}_3")));
            busy(&source, &mut edges);
        }
        let detector = detect(&edges);

        assert_eq!(detector.ring_count(), 50);
        assert!(detector.is_truncated());
        let summary = detector.summary();
        assert_eq!(summary.reasons, vec![TruncationReason::CapExceeded]);
        assert_eq!(detector.rings()[0].member_accounts[0], "X00");
        assert_eq!(detector.rings()[49].member_accounts[0], "X49");
    }

    #[test]
    fn test_custom_shell_threshold() {
        // With a limit of one transaction, S1 and S2 (two each) are busy
        let mut edges = owned(&[("X", "S1"), ("S1", "S2"), ("S2", "S3")]);
        busy("X", &mut edges);
        let config = DetectionConfig::builder()
            .with_shell_max_txn_count(1)
            .build()
            .unwrap();
        assert_eq!(detect_with(&config, &edges).ring_count(), 0);
    }

    #[test]
    fn test_budget_exhaustion() {
        let mut edges = Vec::new();
        for i in 0..10 {
            let source = format!("X{i}");
            edges.push((source.clone(), format!("S{i}_1")));
            edges.push((format!("S{i}_1"), format!("S{i}_2")));
            edges.push((format!("S{i}_2"), format!("S{i}_3")));
            busy(&source, &mut edges);
        }
        let config = DetectionConfig::builder()
            .with_shell_path_budget(7)
            .build()
            .unwrap();
        let detector = detect_with(&config, &edges);

        assert_eq!(detector.summary().reasons, vec![TruncationReason::BudgetExhausted]);
        assert!(detector.ring_count() < 10);
        assert_eq!(detector.summary().explored, 7);
    }
}
