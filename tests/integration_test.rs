//! Integration tests for mule-radar using the library interface

use std::fs;
use std::path::{Path, PathBuf};

use mule_radar::config::DetectionConfig;
use mule_radar::engine::{AnalysisEngine, AnalysisResult};
use mule_radar::error::MuleRadarError;
use mule_radar::graph::{GraphPayload, GraphRenderer, TransactionGraph};
use mule_radar::loader::DatasetLoader;
use mule_radar::reports::{
    GitHubReportGenerator, HumanReportGenerator, JsonReportGenerator, ReportGenerator,
};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

const HEADER: &str = "transaction_id,sender_id,receiver_id,amount,timestamp\n";

/// Writes a CSV export under `dir`, creating parent directories
fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut content = HEADER.to_string();
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

/// Creates a directory of exports: a cycle in one file, a fan-in in another
fn create_export_directory(temp_dir: &TempDir) -> PathBuf {
    let root = temp_dir.path().join("exports");

    write_csv(
        &root,
        "january/cycle.csv",
        &[
            "T1,ACC_A,ACC_B,1000.00,2024-01-05 09:00:00",
            "T2,ACC_B,ACC_C,990.00,2024-01-05 11:00:00",
            "T3,ACC_C,ACC_A,980.00,2024-01-05 13:00:00",
            "T4,ACC_D,ACC_E,25.00,2024-01-06 10:00:00",
        ],
    );

    let fan_in: Vec<String> = (0..12)
        .map(|i| format!("F{i},MULE_{i:02},COLLECTOR,450.00,2024-01-20 {:02}:15:00", 8 + i))
        .collect();
    let fan_in: Vec<&str> = fan_in.iter().map(String::as_str).collect();
    write_csv(&root, "january/fan_in.csv", &fan_in);

    // Ignored: not a CSV file
    fs::write(root.join("README.txt"), "exports for January").unwrap();

    root
}

fn analyze_directory(root: &Path) -> (TransactionGraph, AnalysisResult) {
    let dataset = DatasetLoader::new().load(&[root.to_path_buf()], None).unwrap();
    let engine = AnalysisEngine::new(DetectionConfig::default()).unwrap();
    let graph =
        TransactionGraph::from_rows(&dataset.rows, engine.config().malformed_row_tolerance)
            .unwrap();
    let result = engine.analyze_graph(&graph);
    (graph, result)
}

#[test]
fn test_directory_scan_finds_both_patterns() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_export_directory(&temp_dir);

    let dataset = DatasetLoader::new().load(&[root.clone()], None).unwrap();
    assert_eq!(dataset.files.len(), 2);
    assert_eq!(dataset.row_count(), 16);

    let (_, result) = analyze_directory(&root);
    assert_eq!(result.metadata().account_count, 18);
    assert_eq!(result.ring_count(), 2);

    let tags: Vec<&str> = result
        .rings()
        .iter()
        .map(|ring| ring.pattern_tag.as_str())
        .collect();
    assert_eq!(tags, vec!["cycle_length_3", "smurfing_fan_in"]);
    assert_eq!(result.rings()[1].member_accounts[0], "COLLECTOR");

    let bystander = result.account("ACC_D").unwrap();
    assert_eq!(bystander.suspicion_score, 0.0);
    assert!(bystander.ring_ids.is_empty());
}

#[test]
fn test_reports_from_loaded_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_export_directory(&temp_dir);
    let (_, result) = analyze_directory(&root);

    let human = HumanReportGenerator::new(None)
        .generate_report(&result)
        .unwrap();
    assert!(predicate::str::contains("Found").eval(&human));
    assert!(predicate::str::contains("ACC_A → ACC_B → ACC_C").eval(&human));
    assert!(predicate::str::contains("smurfing_fan_in").eval(&human));

    let github = GitHubReportGenerator::new().generate_report(&result).unwrap();
    assert!(predicate::str::starts_with("::error title=Fraud Rings::Found 2 fraud rings").eval(&github));

    let json: Value =
        serde_json::from_str(&JsonReportGenerator::new().generate_report(&result).unwrap())
            .unwrap();
    assert_eq!(json["summary"]["fraud_rings_detected"], 2);
    assert_eq!(json["summary"]["total_accounts_analyzed"], 18);
    assert_eq!(json["summary"]["suspicious_accounts_flagged"], 16);
    assert_eq!(json["fraud_rings"][0]["ring_id"], "RING_001");
    assert_eq!(json["fraud_rings"][1]["ring_id"], "RING_002");
}

#[test]
fn test_graph_export_formats() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_export_directory(&temp_dir);
    let (graph, result) = analyze_directory(&root);
    let payload = GraphPayload::build(&graph, &result);

    let acc_a = payload.nodes.iter().find(|n| n.id == "ACC_A").unwrap();
    assert!(acc_a.suspicious);
    assert_eq!(acc_a.pattern, "cycle_length_3");
    let acc_d = payload.nodes.iter().find(|n| n.id == "ACC_D").unwrap();
    assert!(!acc_d.suspicious);
    assert_eq!(acc_d.pattern, "normal");

    let mut dot = Vec::new();
    GraphRenderer::new(false).render_dot(&payload, &mut dot).unwrap();
    let dot = String::from_utf8(dot).unwrap();
    assert!(predicate::str::starts_with("digraph transactions {").eval(&dot));
    assert!(predicate::str::contains(r#""ACC_D" -> "ACC_E""#).eval(&dot));

    let mut mermaid = Vec::new();
    GraphRenderer::new(true)
        .render_mermaid(&payload, &mut mermaid)
        .unwrap();
    let mermaid = String::from_utf8(mermaid).unwrap();
    assert!(predicate::str::contains("acct_ACC_A").eval(&mermaid));
    assert!(predicate::str::contains("ACC_D").not().eval(&mermaid));

    let mut json = Vec::new();
    GraphRenderer::new(false).render_json(&payload, &mut json).unwrap();
    let json: Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 18);
    assert_eq!(json["edges"].as_array().unwrap().len(), 16);
}

#[test]
fn test_evidence_packets_for_top_accounts() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_export_directory(&temp_dir);
    let (_, result) = analyze_directory(&root);

    let packets = result.evidence(3);
    assert_eq!(packets.len(), 3);
    for packet in &packets {
        assert!(packet.suspicion_score > 0.0);
        assert!(!packet.rings.is_empty());
        assert!(!packet.transaction_ids.is_empty());
    }
    assert!(packets[0].suspicion_score >= packets[2].suspicion_score);
}

#[test]
fn test_malformed_rows_within_tolerance() {
    let temp_dir = TempDir::new().unwrap();
    let mut rows: Vec<String> = (0..19)
        .map(|i| format!("T{i},A{i},B{i},10.00,2024-01-01 00:00:00"))
        .collect();
    rows.push("BAD,A0,B0,not-a-number,2024-01-01 00:00:00".to_string());
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let path = write_csv(temp_dir.path(), "tx.csv", &rows);

    let dataset = DatasetLoader::new().load(&[path], None).unwrap();
    let graph = TransactionGraph::from_rows(&dataset.rows, 0.10).unwrap();
    assert_eq!(graph.transaction_count(), 19);
    assert_eq!(graph.skipped_records().len(), 1);
}

#[test]
fn test_malformed_rows_over_tolerance_fail() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_csv(
        temp_dir.path(),
        "tx.csv",
        &[
            "T1,A,B,10.00,2024-01-01 00:00:00",
            "T2,A,,10.00,2024-01-01 00:00:00",
            "T3,A,B,-5,2024-01-01 00:00:00",
        ],
    );

    let dataset = DatasetLoader::new().load(&[path], None).unwrap();
    let result = TransactionGraph::from_rows(&dataset.rows, 0.10);
    assert!(matches!(result, Err(MuleRadarError::DatasetError { .. })));
}

#[test]
fn test_missing_column_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tx.csv");
    fs::write(&path, "sender_id,receiver_id,amount\nA,B,10\n").unwrap();

    let result = DatasetLoader::new().load(&[path], None);
    match result {
        Err(MuleRadarError::DatasetError { message }) => {
            assert!(predicate::str::contains("timestamp").eval(&message));
        }
        other => panic!("Expected dataset error, got {other:?}"),
    }
}

#[test]
fn test_detection_config_from_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("mule-radar.toml");
    fs::write(
        &config_path,
        r#"
smurf_threshold = 12
cycle_max_len = 4

[scoring]
membership_weight = 0.5
"#,
    )
    .unwrap();

    let config = DetectionConfig::from_file(&config_path).unwrap();
    assert_eq!(config.smurf_threshold, 12);
    assert_eq!(config.cycle_max_len, 4);
    assert_eq!(config.scoring.membership_weight, 0.5);
    // Unspecified keys keep their defaults
    assert_eq!(config.shell_chain_cap, 50);

    // With a threshold of 12, the twelve-sender fan-in still qualifies
    let root = create_export_directory(&temp_dir);
    let dataset = DatasetLoader::new().load(&[root], None).unwrap();
    let engine = AnalysisEngine::new(config).unwrap();
    let graph = TransactionGraph::from_rows(&dataset.rows, 0.1).unwrap();
    assert_eq!(engine.analyze_graph(&graph).ring_count(), 2);
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("mule-radar.toml");
    fs::write(&config_path, "smurf_treshold = 12\n").unwrap();

    assert!(matches!(
        DetectionConfig::from_file(&config_path),
        Err(MuleRadarError::TomlParseError(_))
    ));
}
