use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;

use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::engine::AnalysisResult;
use crate::error::MuleRadarError;
use crate::graph::TransactionGraph;
use crate::utils::string::format_amount;

// Blue-Orange Accessible Palette
mod colors {
    pub const NORMAL_NODE_FILL: &str = "#E3F2FD";
    pub const NORMAL_NODE_STROKE: &str = "#1976D2";
    pub const SUSPICIOUS_NODE_FILL: &str = "#FFF3E0";
    pub const SUSPICIOUS_NODE_STROKE: &str = "#F57C00";
    pub const NORMAL_EDGE: &str = "#64B5F6";
    pub const SUSPICIOUS_EDGE: &str = "#FF6500";
}

// Helper macro for write operations that converts IO errors
macro_rules! writeln_out {
    ($dst:expr) => {
        writeln!($dst).map_err(MuleRadarError::from)
    };
    ($dst:expr, $($arg:tt)*) => {
        writeln!($dst, $($arg)*).map_err(MuleRadarError::from)
    };
}

/// Pattern label for accounts that belong to no ring
pub const NORMAL_PATTERN: &str = "normal";

/// An account as handed to a visualization layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadNode {
    pub id: String,
    pub suspicious: bool,
    pub suspicion_score: f64,
    /// Tag of the account's first ring, or `normal`
    pub pattern: String,
    pub tx_count: usize,
}

/// All transfers between one ordered pair of accounts, merged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadEdge {
    pub source: String,
    pub target: String,
    pub amount: f64,
    pub count: usize,
    /// Either endpoint is suspicious
    pub suspicious: bool,
}

/// Node and edge lists for a visualization layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPayload {
    pub nodes: Vec<PayloadNode>,
    pub edges: Vec<PayloadEdge>,
}

impl GraphPayload {
    /// Nodes keep first-appearance order; edges are sorted by source then
    /// target id
    pub fn build(graph: &TransactionGraph, result: &AnalysisResult) -> Self {
        let scores: HashMap<&str, (f64, Option<&str>)> = result
            .accounts()
            .iter()
            .map(|account| {
                let first_ring = account
                    .ring_ids
                    .first()
                    .and_then(|id| result.ring(id))
                    .map(|ring| ring.pattern_tag.as_str());
                (
                    account.account_id.as_str(),
                    (account.suspicion_score, first_ring),
                )
            })
            .collect();

        let lookup = |id: &str| scores.get(id).copied().unwrap_or((0.0, None));

        let nodes = graph
            .accounts()
            .map(|(_, account)| {
                let (score, pattern) = lookup(&account.id);
                PayloadNode {
                    id: account.id.clone(),
                    suspicious: score > 0.0,
                    suspicion_score: score,
                    pattern: pattern.unwrap_or(NORMAL_PATTERN).to_string(),
                    tx_count: account.transaction_count(),
                }
            })
            .collect();

        let mut merged: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
        for edge in graph.graph().edge_references() {
            let source = graph.account(edge.source()).id.as_str();
            let target = graph.account(edge.target()).id.as_str();
            let entry = merged.entry((source, target)).or_insert((0.0, 0));
            entry.0 += edge.weight().amount;
            entry.1 += 1;
        }

        let edges = merged
            .into_iter()
            .map(|((source, target), (amount, count))| PayloadEdge {
                source: source.to_string(),
                target: target.to_string(),
                amount,
                count,
                suspicious: lookup(source).0 > 0.0 || lookup(target).0 > 0.0,
            })
            .collect();

        Self { nodes, edges }
    }
}

/// Renders a [`GraphPayload`] in the supported export formats
pub struct GraphRenderer {
    suspicious_only: bool,
}

impl GraphRenderer {
    /// With `suspicious_only`, DOT and Mermaid output keep only suspicious
    /// accounts and the edges between them
    pub fn new(suspicious_only: bool) -> Self {
        Self { suspicious_only }
    }

    fn visible<'a>(
        &self,
        payload: &'a GraphPayload,
    ) -> (Vec<&'a PayloadNode>, Vec<&'a PayloadEdge>) {
        if !self.suspicious_only {
            return (payload.nodes.iter().collect(), payload.edges.iter().collect());
        }

        let nodes: Vec<&PayloadNode> = payload.nodes.iter().filter(|n| n.suspicious).collect();
        let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges = payload
            .edges
            .iter()
            .filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
            .collect();
        (nodes, edges)
    }

    pub fn render_json(
        &self,
        payload: &GraphPayload,
        output: &mut dyn Write,
    ) -> Result<(), MuleRadarError> {
        serde_json::to_writer_pretty(&mut *output, payload)?;
        writeln_out!(output)
    }

    pub fn render_dot(
        &self,
        payload: &GraphPayload,
        output: &mut dyn Write,
    ) -> Result<(), MuleRadarError> {
        let (nodes, edges) = self.visible(payload);

        writeln_out!(output, "digraph transactions {{")?;
        writeln_out!(output, "    rankdir=LR;")?;
        writeln_out!(output, "    node [shape=box, style=rounded];")?;
        writeln_out!(output)?;

        for node in nodes {
            let (fill_color, stroke_color) = if node.suspicious {
                (colors::SUSPICIOUS_NODE_FILL, colors::SUSPICIOUS_NODE_STROKE)
            } else {
                (colors::NORMAL_NODE_FILL, colors::NORMAL_NODE_STROKE)
            };

            let label = if node.suspicious {
                format!("{}\\n{} ({:.2})", node.id, node.pattern, node.suspicion_score)
            } else {
                node.id.clone()
            };

            writeln_out!(
                output,
                r#"    "{}" [label="{}", style=filled, fillcolor="{}", color="{}", penwidth=2];"#,
                dot_escape(&node.id),
                dot_escape(&label),
                fill_color,
                stroke_color
            )?;
        }

        writeln_out!(output)?;

        for edge in edges {
            let (color, width) = if edge.suspicious {
                (colors::SUSPICIOUS_EDGE, 3)
            } else {
                (colors::NORMAL_EDGE, 2)
            };
            writeln_out!(
                output,
                r#"    "{}" -> "{}" [label="{}", color="{}", penwidth={}];"#,
                dot_escape(&edge.source),
                dot_escape(&edge.target),
                edge_label(edge),
                color,
                width
            )?;
        }

        writeln_out!(output, "}}")?;
        Ok(())
    }

    pub fn render_mermaid(
        &self,
        payload: &GraphPayload,
        output: &mut dyn Write,
    ) -> Result<(), MuleRadarError> {
        let (nodes, edges) = self.visible(payload);

        writeln_out!(output, "graph LR")?;

        for node in &nodes {
            let node_id = mermaid_id(&node.id);
            if node.suspicious {
                // Double circle for ring members
                writeln_out!(
                    output,
                    "    {}((\"{}<br/>{}\"))",
                    node_id,
                    node.id,
                    node.pattern
                )?;
                writeln_out!(
                    output,
                    "    style {} fill:{},stroke:{},stroke-width:3px",
                    node_id,
                    colors::SUSPICIOUS_NODE_FILL,
                    colors::SUSPICIOUS_NODE_STROKE
                )?;
            } else {
                writeln_out!(output, "    {}[\"{}\"]", node_id, node.id)?;
                writeln_out!(
                    output,
                    "    style {} fill:{},stroke:{},stroke-width:2px",
                    node_id,
                    colors::NORMAL_NODE_FILL,
                    colors::NORMAL_NODE_STROKE
                )?;
            }
        }

        writeln_out!(output)?;

        for (link_style_index, edge) in edges.iter().enumerate() {
            writeln_out!(
                output,
                "    {} -->|{}| {}",
                mermaid_id(&edge.source),
                edge_label(edge),
                mermaid_id(&edge.target)
            )?;
            let (color, width) = if edge.suspicious {
                (colors::SUSPICIOUS_EDGE, 3)
            } else {
                (colors::NORMAL_EDGE, 2)
            };
            writeln_out!(
                output,
                "    linkStyle {} stroke:{},stroke-width:{}px",
                link_style_index,
                color,
                width
            )?;
        }

        Ok(())
    }
}

fn edge_label(edge: &PayloadEdge) -> String {
    if edge.count > 1 {
        format!("{} x{}", format_amount(edge.amount), edge.count)
    } else {
        format_amount(edge.amount)
    }
}

fn dot_escape(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn mermaid_id(name: &str) -> String {
    // Replace non-alphanumeric characters with underscores for valid Mermaid IDs
    let id: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("acct_{id}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::DetectionConfig;
    use crate::engine::AnalysisEngine;
    use crate::graph::TransactionRecord;

    fn analyzed() -> (TransactionGraph, AnalysisResult) {
        let records = vec![
            TransactionRecord::new("T1", "A", "B", "1000", "2024-01-01 09:00:00"),
            TransactionRecord::new("T2", "B", "C", "1000", "2024-01-01 10:00:00"),
            TransactionRecord::new("T3", "C", "A", "1000", "2024-01-01 11:00:00"),
            TransactionRecord::new("T4", "C", "A", "500", "2024-01-01 12:00:00"),
            TransactionRecord::new("T5", "D", "E", "75", "2024-01-02 12:00:00"),
        ];
        let engine = AnalysisEngine::new(DetectionConfig::default()).unwrap();
        let graph = engine.build_graph(&records).unwrap();
        let result = engine.analyze_graph(&graph);
        (graph, result)
    }

    fn render(f: impl Fn(&mut Vec<u8>) -> Result<(), MuleRadarError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_payload_nodes_and_merged_edges() {
        let (graph, result) = analyzed();
        let payload = GraphPayload::build(&graph, &result);

        let nodes: Vec<(&str, bool, &str, usize)> = payload
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.suspicious, n.pattern.as_str(), n.tx_count))
            .collect();
        assert_eq!(
            nodes,
            vec![
                ("A", true, "cycle_length_3", 3),
                ("B", true, "cycle_length_3", 2),
                ("C", true, "cycle_length_3", 3),
                ("D", false, NORMAL_PATTERN, 1),
                ("E", false, NORMAL_PATTERN, 1),
            ]
        );

        assert_eq!(payload.edges.len(), 4);
        let c_to_a = payload
            .edges
            .iter()
            .find(|e| e.source == "C" && e.target == "A")
            .unwrap();
        assert_eq!(c_to_a.count, 2);
        assert_eq!(c_to_a.amount, 1500.0);
        assert!(c_to_a.suspicious);
        assert!(!payload.edges[3].suspicious);
    }

    #[test]
    fn test_render_dot() {
        let (graph, result) = analyzed();
        let payload = GraphPayload::build(&graph, &result);
        let output = render(|out| GraphRenderer::new(false).render_dot(&payload, out));

        assert!(output.starts_with("digraph transactions {"));
        assert!(output.contains(r#""C" -> "A" [label="1,500.00 x2""#));
        assert!(output.contains(r#""D" -> "E""#));
        assert!(output.trim_end().ends_with('}'));
    }

    #[test]
    fn test_render_mermaid_suspicious_only() {
        let (graph, result) = analyzed();
        let payload = GraphPayload::build(&graph, &result);
        let output = render(|out| GraphRenderer::new(true).render_mermaid(&payload, out));

        assert!(output.starts_with("graph LR"));
        assert!(output.contains("acct_A((\"A<br/>cycle_length_3\"))"));
        assert!(output.contains("acct_A -->|1,000.00| acct_B"));
        assert!(!output.contains("acct_D"));
    }

    #[test]
    fn test_render_json_round_trips_fields() {
        let (graph, result) = analyzed();
        let payload = GraphPayload::build(&graph, &result);
        let output = render(|out| GraphRenderer::new(false).render_json(&payload, out));

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["nodes"][0]["id"], "A");
        assert_eq!(value["nodes"][0]["pattern"], "cycle_length_3");
        assert_eq!(value["edges"].as_array().unwrap().len(), 4);
    }
}
