//! End-to-end detection scenarios through the library interface

use mule_radar::aggregator::RingAggregator;
use mule_radar::common::ConfigBuilder;
use mule_radar::config::{DetectionConfig, ScoringConfig};
use mule_radar::detector::{DetectedRing, DetectorKind, PatternType, TruncationReason};
use mule_radar::engine::AnalysisEngine;
use mule_radar::graph::{TransactionGraph, TransactionRecord};
use pretty_assertions::assert_eq;

fn analyze(records: &[TransactionRecord]) -> mule_radar::engine::AnalysisResult {
    AnalysisEngine::new(DetectionConfig::default())
        .unwrap()
        .analyze(records)
        .unwrap()
}

/// Gives `account` three outgoing transfers so it is never a shell
fn make_busy(account: &str, records: &mut Vec<TransactionRecord>) {
    for j in 0..3 {
        records.push(TransactionRecord::new(
            &format!("{account}_B{j}"),
            account,
            &format!("{account}_OUT{j}"),
            "10",
            "2024-01-01 00:00:00",
        ));
    }
}

#[test]
fn test_three_account_cycle() {
    let records = vec![
        TransactionRecord::new("T1", "A", "B", "1000", "2024-01-01 09:00:00"),
        TransactionRecord::new("T2", "B", "C", "1000", "2024-01-01 12:00:00"),
        TransactionRecord::new("T3", "C", "A", "1000", "2024-01-01 15:00:00"),
    ];
    let result = analyze(&records);

    assert_eq!(result.ring_count(), 1);
    let ring = &result.rings()[0];
    assert_eq!(ring.pattern_type, PatternType::Cycle);
    assert_eq!(ring.member_accounts, vec!["A", "B", "C"]);
    assert!((60.0..=80.0).contains(&ring.risk_score));

    for id in ["A", "B", "C"] {
        let account = result.account(id).unwrap();
        assert!(account.detected_patterns.contains("cycle_length_3"));
        assert_eq!(account.ring_ids, vec!["RING_001"]);
    }
}

#[test]
fn test_clustered_fan_in() {
    let records: Vec<TransactionRecord> = (0..10)
        .map(|i| {
            TransactionRecord::new(
                &format!("F{i}"),
                &format!("SRC_{i}"),
                "H",
                "100",
                &format!("2024-01-01 10:{:02}:00", i * 12),
            )
        })
        .collect();
    let result = analyze(&records);

    assert_eq!(result.ring_count(), 1);
    let ring = &result.rings()[0];
    assert_eq!(ring.pattern_type, PatternType::SmurfFanIn);
    assert_eq!(ring.member_accounts[0], "H");
    assert_eq!(ring.member_accounts.len(), 11);
    assert!((50.0..=85.0).contains(&ring.risk_score));
    // Threshold met exactly, so the whole lift over the base is temporal
    assert_eq!(ring.risk_score, 65.0);
    assert!(
        result
            .account("H")
            .unwrap()
            .detected_patterns
            .contains("smurfing_fan_in")
    );
}

#[test]
fn test_shell_chain_cap_truncates() {
    let mut records = Vec::new();
    for i in 0..60 {
        let source = format!("SRC{i:02}");
        let hops = [
            source.clone(),
            format!("SH{i:02}_1"),
            format!("SH{i:02}_2"),
            format!("SH{i:02}_3"),
        ];
        for (k, pair) in hops.windows(2).enumerate() {
            records.push(TransactionRecord::new(
                &format!("C{i:02}_{k}"),
                &pair[0],
                &pair[1],
                "500",
                "2024-02-01 08:00:00",
            ));
        }
        make_busy(&source, &mut records);
    }
    let result = analyze(&records);

    let shell_rings: Vec<_> = result
        .rings()
        .iter()
        .filter(|ring| ring.pattern_type == PatternType::ShellChain)
        .collect();
    assert_eq!(shell_rings.len(), 50);
    assert!(result.is_truncated());

    let summary = result.detector(DetectorKind::ShellChains).unwrap();
    assert!(summary.truncated);
    assert_eq!(summary.reasons, vec![TruncationReason::CapExceeded]);
}

#[test]
fn test_cycle_and_fan_in_membership_score() {
    let graph = TransactionGraph::from_records(
        &[
            TransactionRecord::new("T1", "M", "P", "100", "2024-01-01"),
            TransactionRecord::new("T2", "P", "Q", "100", "2024-01-01"),
            TransactionRecord::new("T3", "Q", "M", "100", "2024-01-01"),
        ],
        0.0,
    )
    .unwrap();

    let rings = vec![
        DetectedRing {
            pattern_type: PatternType::Cycle,
            member_accounts: vec!["M".into(), "P".into(), "Q".into()],
            risk_score: 70.0,
            total_amount: 300.0,
            evidence: vec!["T1".into(), "T2".into(), "T3".into()],
        },
        DetectedRing {
            pattern_type: PatternType::SmurfFanIn,
            member_accounts: vec!["M".into(), "P".into()],
            risk_score: 60.0,
            total_amount: 100.0,
            evidence: vec!["T1".into()],
        },
    ];

    let (_, accounts) = RingAggregator::new(&ScoringConfig::default()).aggregate(&graph, rings);
    let m = accounts.iter().find(|a| a.account_id == "M").unwrap();
    assert_eq!(m.suspicion_score, 78.0);
    assert_eq!(m.ring_ids, vec!["RING_001", "RING_002"]);
}

#[test]
fn test_dense_graph_scores_stay_within_hundred() {
    let ids = ["A", "B", "C", "D", "E"];
    let mut records = Vec::new();
    for from in ids {
        for to in ids {
            if from != to {
                let n = records.len();
                records.push(TransactionRecord::new(
                    &format!("T{n}"),
                    from,
                    to,
                    "500",
                    "2024-01-01 09:00:00",
                ));
            }
        }
    }

    let result = analyze(&records);
    let top = result
        .accounts()
        .iter()
        .map(|a| a.suspicion_score)
        .fold(0.0, f64::max);
    assert_eq!(top, 100.0);

    let inflated = ScoringConfig {
        suspicion_ceiling: 500.0,
        ..ScoringConfig::default()
    };
    let config = DetectionConfig {
        scoring: inflated,
        ..DetectionConfig::default()
    };
    assert!(AnalysisEngine::new(config).is_err());
}

#[test]
fn test_repeated_runs_are_identical() {
    let mut records = vec![
        TransactionRecord::new("T1", "A", "B", "1000", "2024-01-01 09:00:00"),
        TransactionRecord::new("T2", "B", "C", "1000", "2024-01-01 10:00:00"),
        TransactionRecord::new("T3", "C", "A", "1000", "2024-01-01 11:00:00"),
        TransactionRecord::new("T4", "C", "D", "900", "2024-01-01 12:00:00"),
        TransactionRecord::new("T5", "D", "B", "900", "2024-01-01 13:00:00"),
    ];
    for i in 0..12 {
        records.push(TransactionRecord::new(
            &format!("P{i}"),
            "PAYER",
            &format!("R{i}"),
            "250",
            &format!("2024-01-02 {:02}:00:00", i),
        ));
    }

    let parallel = AnalysisEngine::new(DetectionConfig::default()).unwrap();
    let sequential = AnalysisEngine::new(
        DetectionConfig::builder()
            .with_parallel(false)
            .build()
            .unwrap(),
    )
    .unwrap();

    let first = parallel.analyze(&records).unwrap();
    for _ in 0..3 {
        let again = parallel.analyze(&records).unwrap();
        assert_eq!(again.rings(), first.rings());
        assert_eq!(again.accounts(), first.accounts());
    }
    let other = sequential.analyze(&records).unwrap();
    assert_eq!(other.rings(), first.rings());
    assert_eq!(other.accounts(), first.accounts());
}

#[test]
fn test_result_invariants_hold() {
    let mut records = vec![
        TransactionRecord::new("T1", "A", "B", "1000", "2024-01-01 09:00:00"),
        TransactionRecord::new("T2", "B", "C", "1000", "2024-01-01 10:00:00"),
        TransactionRecord::new("T3", "C", "D", "1000", "2024-01-01 11:00:00"),
        TransactionRecord::new("T4", "D", "A", "1000", "2024-01-01 12:00:00"),
        TransactionRecord::new("T5", "A", "C", "500", "2024-01-01 13:00:00"),
    ];
    for i in 0..15 {
        records.push(TransactionRecord::new(
            &format!("F{i}"),
            &format!("MULE_{i:02}"),
            "A",
            "95",
            &format!("2024-01-03 {:02}:30:00", i),
        ));
    }
    let result = analyze(&records);
    assert!(result.has_rings());

    for (i, ring) in result.rings().iter().enumerate() {
        assert_eq!(ring.ring_id, format!("RING_{:03}", i + 1));
        assert!((0.0..=100.0).contains(&ring.risk_score));
        if ring.pattern_type == PatternType::Cycle {
            assert!((3..=5).contains(&ring.member_accounts.len()));
        }
    }
    // Rings appear in canonical pattern order
    let types: Vec<PatternType> = result.rings().iter().map(|r| r.pattern_type).collect();
    let mut sorted = types.clone();
    sorted.sort();
    assert_eq!(types, sorted);

    for account in result.accounts() {
        assert!((0.0..=100.0).contains(&account.suspicion_score));
        for ring_id in &account.ring_ids {
            assert!(result.ring(ring_id).unwrap().contains(&account.account_id));
        }
    }
    let scores: Vec<f64> = result.accounts().iter().map(|a| a.suspicion_score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}
