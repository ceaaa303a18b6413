//! # Pattern Detection Module
//!
//! This module implements the three structural detectors that run over a
//! [`TransactionGraph`](crate::graph::TransactionGraph).
//!
//! ## Algorithms
//!
//! - **CycleDetector**: Tarjan's strongly connected components narrow the
//!   search to mutually reachable accounts, then a depth-bounded DFS
//!   enumerates simple cycles of 3 to 5 accounts (circular routing).
//! - **SmurfDetector**: counts distinct counterparts per account in each
//!   direction and flags fan-in / fan-out hubs (structuring).
//! - **ShellChainDetector**: follows money from active accounts through runs
//!   of low-activity shell accounts (layering).
//!
//! Every detector is read-only over the graph and owns a [`SearchBudget`];
//! when the budget runs out it keeps what it found and reports itself as
//! truncated instead of failing.
//!
//! ## Example
//!
//! ```
//! use mule_radar::config::DetectionConfig;
//! use mule_radar::detector::{CycleDetector, PatternDetector};
//! use mule_radar::graph::{TransactionGraph, TransactionRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![
//!     TransactionRecord::new("T1", "A", "B", "1000", "2024-01-01 09:00:00"),
//!     TransactionRecord::new("T2", "B", "C", "1000", "2024-01-01 10:00:00"),
//!     TransactionRecord::new("T3", "C", "A", "1000", "2024-01-01 11:00:00"),
//! ];
//! let graph = TransactionGraph::from_records(&records, 0.1)?;
//!
//! let mut detector = CycleDetector::new(&DetectionConfig::default());
//! detector.detect(&graph);
//!
//! assert_eq!(detector.ring_count(), 1);
//! assert_eq!(detector.rings()[0].member_accounts, vec!["A", "B", "C"]);
//! # Ok(())
//! # }
//! ```

mod budget;
mod cycles;
mod scc;
mod shell;
mod smurf;
mod types;

pub use budget::SearchBudget;
pub use cycles::CycleDetector;
pub use scc::strongly_connected_components;
pub use shell::ShellChainDetector;
pub use smurf::SmurfDetector;
pub use types::{DetectedRing, DetectorKind, DetectorSummary, PatternType, TruncationReason};

use crate::graph::TransactionGraph;

/// Common interface of the structural detectors
pub trait PatternDetector: Send {
    fn kind(&self) -> DetectorKind;

    /// Run the detector, replacing any previous results
    fn detect(&mut self, graph: &TransactionGraph);

    /// Rings found by the last run, in the detector's canonical order
    fn rings(&self) -> &[DetectedRing];

    fn summary(&self) -> DetectorSummary;

    fn has_rings(&self) -> bool {
        !self.rings().is_empty()
    }

    fn ring_count(&self) -> usize {
        self.rings().len()
    }
}
