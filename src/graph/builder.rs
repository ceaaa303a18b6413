use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{AccountNode, GraphMetadata, SkippedRecord, TransactionRecord, TransferEdge};
use crate::constants::output::TXN_ID_PREFIX;
use crate::error::{MuleRadarError, RecordError};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Directed multigraph of accounts and the transfers between them
///
/// Accounts are stored in first-appearance order and every transaction is a
/// separate edge, so repeated transfers between the same pair stay distinct.
#[derive(Debug, Clone)]
pub struct TransactionGraph {
    graph: DiGraph<AccountNode, TransferEdge>,
    account_indices: HashMap<String, NodeIndex>,
    skipped: Vec<SkippedRecord>,
    records_read: usize,
}

impl TransactionGraph {
    /// Validate `records` and build the graph in one step
    pub fn from_records(
        records: &[TransactionRecord],
        malformed_row_tolerance: f64,
    ) -> Result<Self, MuleRadarError> {
        let mut builder = TransactionGraphBuilder::new(malformed_row_tolerance);
        builder.add_records(records);
        builder.finish()
    }

    /// Build from decoded dataset rows; rows that failed to decode count as
    /// malformed
    pub fn from_rows(
        rows: &[Result<TransactionRecord, RecordError>],
        malformed_row_tolerance: f64,
    ) -> Result<Self, MuleRadarError> {
        let mut builder = TransactionGraphBuilder::new(malformed_row_tolerance);
        for row in rows {
            builder.add_row(row);
        }
        builder.finish()
    }

    pub fn graph(&self) -> &DiGraph<AccountNode, TransferEdge> {
        &self.graph
    }

    pub fn account_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transaction_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn index_of(&self, account_id: &str) -> Option<NodeIndex> {
        self.account_indices.get(account_id).copied()
    }

    pub fn account(&self, idx: NodeIndex) -> &AccountNode {
        &self.graph[idx]
    }

    pub fn account_by_id(&self, account_id: &str) -> Option<&AccountNode> {
        self.index_of(account_id).map(|idx| &self.graph[idx])
    }

    /// Accounts in first-appearance order
    pub fn accounts(&self) -> impl Iterator<Item = (NodeIndex, &AccountNode)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn skipped_records(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Distinct accounts that `idx` sent money to, sorted by account id
    ///
    /// Self-transfers are excluded.
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.distinct_neighbors(idx, Direction::Outgoing)
    }

    /// Distinct accounts that sent money to `idx`, sorted by account id
    pub fn predecessors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.distinct_neighbors(idx, Direction::Incoming)
    }

    fn distinct_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter(|&n| n != idx)
            .collect();
        neighbors.sort_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
        neighbors.dedup();
        neighbors
    }

    /// All transfers from `from` to `to`, ordered by timestamp then id
    pub fn transfers_between(&self, from: NodeIndex, to: NodeIndex) -> Vec<&TransferEdge> {
        let mut transfers: Vec<&TransferEdge> = self
            .graph
            .edges_connecting(from, to)
            .map(|edge| edge.weight())
            .collect();
        sort_transfers(&mut transfers);
        transfers
    }

    /// Transfers touching `idx` in one direction, excluding self-transfers
    pub fn transfers(&self, idx: NodeIndex, direction: Direction) -> Vec<&TransferEdge> {
        let mut transfers: Vec<&TransferEdge> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|edge| edge.source() != edge.target())
            .map(|edge| edge.weight())
            .collect();
        sort_transfers(&mut transfers);
        transfers
    }

    pub fn metadata(&self) -> GraphMetadata {
        let mut metadata = GraphMetadata {
            account_count: self.graph.node_count(),
            transaction_count: self.graph.edge_count(),
            records_read: self.records_read,
            records_skipped: self.skipped.len(),
            ..GraphMetadata::default()
        };

        for edge in self.graph.edge_references() {
            if edge.source() == edge.target() {
                metadata.self_loop_count += 1;
            }
            let transfer = edge.weight();
            metadata.total_volume += transfer.amount;
            metadata.earliest = Some(
                metadata
                    .earliest
                    .map_or(transfer.timestamp, |ts| ts.min(transfer.timestamp)),
            );
            metadata.latest = Some(
                metadata
                    .latest
                    .map_or(transfer.timestamp, |ts| ts.max(transfer.timestamp)),
            );
        }

        metadata
    }
}

fn sort_transfers(transfers: &mut [&TransferEdge]) {
    transfers.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });
}

/// Builder for constructing transaction graphs
///
/// Rows are validated as they are added; rejected rows are remembered and
/// only become fatal in [`TransactionGraphBuilder::finish`] when their share
/// exceeds the configured tolerance.
pub struct TransactionGraphBuilder {
    graph: DiGraph<AccountNode, TransferEdge>,
    account_indices: HashMap<String, NodeIndex>,
    skipped: Vec<SkippedRecord>,
    records_read: usize,
    malformed_row_tolerance: f64,
}

impl TransactionGraphBuilder {
    pub fn new(malformed_row_tolerance: f64) -> Self {
        Self {
            graph: DiGraph::new(),
            account_indices: HashMap::new(),
            skipped: Vec::new(),
            records_read: 0,
            malformed_row_tolerance,
        }
    }

    pub fn graph(&self) -> &DiGraph<AccountNode, TransferEdge> {
        &self.graph
    }

    pub fn add_records(&mut self, records: &[TransactionRecord]) {
        for record in records {
            self.add_record(record);
        }
    }

    /// Add a row that was either decoded into a record or failed to decode
    pub fn add_row(&mut self, row: &Result<TransactionRecord, RecordError>) {
        match row {
            Ok(record) => self.add_record(record),
            Err(reason) => {
                self.records_read += 1;
                self.skipped.push(SkippedRecord {
                    row: self.records_read,
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Validate one record and add it as an edge, or remember why not
    pub fn add_record(&mut self, record: &TransactionRecord) {
        self.records_read += 1;
        let row = self.records_read;

        match validate_record(record) {
            Ok((sender, receiver, amount, timestamp)) => {
                let transaction_id = match record.transaction_id.trim() {
                    "" => format!("{TXN_ID_PREFIX}{row}"),
                    id => id.to_string(),
                };

                let from = self.account_index(sender);
                let to = self.account_index(receiver);

                self.graph[from].out_count += 1;
                self.graph[from].total_out += amount;
                self.graph[to].in_count += 1;
                self.graph[to].total_in += amount;

                self.graph.add_edge(
                    from,
                    to,
                    TransferEdge {
                        transaction_id,
                        amount,
                        timestamp,
                    },
                );
            }
            Err(reason) => self.skipped.push(SkippedRecord { row, reason }),
        }
    }

    fn account_index(&mut self, account_id: &str) -> NodeIndex {
        if let Some(&idx) = self.account_indices.get(account_id) {
            return idx;
        }
        let idx = self.graph.add_node(AccountNode::new(account_id));
        self.account_indices.insert(account_id.to_string(), idx);
        idx
    }

    /// Finish the graph, failing when too many rows were malformed
    pub fn finish(self) -> Result<TransactionGraph, MuleRadarError> {
        if self.records_read > 0 {
            let skipped_fraction = self.skipped.len() as f64 / self.records_read as f64;
            if skipped_fraction > self.malformed_row_tolerance {
                return Err(MuleRadarError::dataset(format!(
                    "{} of {} rows are malformed ({:.1}%), above the {:.1}% tolerance",
                    self.skipped.len(),
                    self.records_read,
                    skipped_fraction * 100.0,
                    self.malformed_row_tolerance * 100.0
                )));
            }
        }

        Ok(TransactionGraph {
            graph: self.graph,
            account_indices: self.account_indices,
            skipped: self.skipped,
            records_read: self.records_read,
        })
    }
}

fn validate_record(
    record: &TransactionRecord,
) -> Result<(&str, &str, f64, DateTime<Utc>), RecordError> {
    let sender = record.sender_id.trim();
    if sender.is_empty() {
        return Err(RecordError::MissingSender);
    }
    let receiver = record.receiver_id.trim();
    if receiver.is_empty() {
        return Err(RecordError::MissingReceiver);
    }

    let raw_amount = record.amount.trim();
    let amount: f64 = raw_amount
        .parse()
        .ok()
        .filter(|amount: &f64| amount.is_finite())
        .ok_or_else(|| RecordError::InvalidAmount {
            value: raw_amount.to_string(),
        })?;
    if amount <= 0.0 {
        return Err(RecordError::NonPositiveAmount {
            value: raw_amount.to_string(),
        });
    }

    let timestamp =
        parse_timestamp(&record.timestamp).ok_or_else(|| RecordError::InvalidTimestamp {
            value: record.timestamp.trim().to_string(),
        })?;

    Ok((sender, receiver, amount, timestamp))
}

/// Parse RFC 3339 or common naive layouts; naive values are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
