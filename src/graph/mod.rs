//! # Transaction Graph Module
//!
//! Builds the directed multigraph the detectors work on and renders analysis
//! results back out for visualization.
//!
//! ## Components
//!
//! ### Graph Building
//! - **TransactionGraphBuilder**: validates raw records and adds one edge
//!   per transaction, remembering the rows it had to skip
//! - **TransactionGraph**: read-only view with sorted neighbor and transfer
//!   lookups
//! - **AccountNode** / **TransferEdge**: node and edge weights
//!
//! ### Graph Rendering
//! - **GraphPayload**: node and merged-edge lists for a presentation layer
//! - **GraphRenderer**: writes a payload as JSON, DOT or Mermaid
//!
//! ## Example
//!
//! ```
//! use mule_radar::graph::{TransactionGraph, TransactionRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![
//!     TransactionRecord::new("T1", "A", "B", "250", "2024-01-01T09:00:00Z"),
//!     TransactionRecord::new("T2", "A", "B", "100", "2024-01-01T10:00:00Z"),
//!     TransactionRecord::new("T3", "B", "C", "not a number", "2024-01-01"),
//! ];
//!
//! // One malformed row out of three is within a 50% tolerance
//! let graph = TransactionGraph::from_records(&records, 0.5)?;
//!
//! assert_eq!(graph.account_count(), 2);
//! assert_eq!(graph.transaction_count(), 2);
//! assert_eq!(graph.skipped_records().len(), 1);
//! # Ok(())
//! # }
//! ```

mod builder;
mod renderer;
mod types;

pub use builder::{TransactionGraph, TransactionGraphBuilder, parse_timestamp};
pub use renderer::{GraphPayload, GraphRenderer, NORMAL_PATTERN, PayloadEdge, PayloadNode};
pub use types::{
    AccountNode, GraphMetadata, SkippedRecord, TransactionRecord, TransferEdge,
};
