//! Core graph types
//!
//! This module contains the fundamental data structures used in the
//! transaction graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// An unvalidated transaction row as it arrives from a dataset
///
/// Every field is kept as text so that malformed values reach the graph
/// builder, which decides whether the row is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub receiver_id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub timestamp: String,
}

impl TransactionRecord {
    pub fn new(
        transaction_id: &str,
        sender_id: &str,
        receiver_id: &str,
        amount: &str,
        timestamp: &str,
    ) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            amount: amount.to_string(),
            timestamp: timestamp.to_string(),
        }
    }
}

/// Represents an account in the transaction graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountNode {
    pub id: String,
    pub in_count: usize,
    pub out_count: usize,
    pub total_in: f64,
    pub total_out: f64,
}

impl AccountNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            in_count: 0,
            out_count: 0,
            total_in: 0.0,
            total_out: 0.0,
        }
    }

    /// Incoming plus outgoing transactions; a self-transfer counts on both sides
    pub fn transaction_count(&self) -> usize {
        self.in_count + self.out_count
    }
}

/// A single money transfer between two accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferEdge {
    pub transaction_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// A record the builder refused, with its 1-based row number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub row: usize,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: RecordError,
}

fn serialize_reason<S: serde::Serializer>(
    reason: &RecordError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

impl SkippedRecord {
    pub fn to_error(&self) -> crate::error::MuleRadarError {
        crate::error::MuleRadarError::InputError {
            row: self.row,
            source: self.reason.clone(),
        }
    }
}

/// Summary numbers describing the graph a run analyzed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphMetadata {
    pub account_count: usize,
    pub transaction_count: usize,
    pub self_loop_count: usize,
    pub total_volume: f64,
    pub records_read: usize,
    pub records_skipped: usize,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}
