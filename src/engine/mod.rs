//! # Analysis Engine
//!
//! Ties the pipeline together: graph construction, the three detectors and
//! ring aggregation. Detectors only read the graph, so they run side by side
//! under [`rayon::join`] unless the configuration asks for a sequential run;
//! both modes produce the same result.
//!
//! ## Example
//!
//! ```
//! use mule_radar::config::DetectionConfig;
//! use mule_radar::engine::AnalysisEngine;
//! use mule_radar::graph::TransactionRecord;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![
//!     TransactionRecord::new("T1", "A", "B", "1000", "2024-01-01 09:00:00"),
//!     TransactionRecord::new("T2", "B", "C", "1000", "2024-01-01 10:00:00"),
//!     TransactionRecord::new("T3", "C", "A", "1000", "2024-01-01 11:00:00"),
//! ];
//!
//! let engine = AnalysisEngine::new(DetectionConfig::default())?;
//! let result = engine.analyze(&records)?;
//!
//! assert_eq!(result.ring_count(), 1);
//! assert_eq!(result.rings()[0].ring_id, "RING_001");
//! assert_eq!(result.suspicious_accounts().count(), 3);
//! # Ok(())
//! # }
//! ```

mod result;

use std::time::Instant;

pub use result::{AnalysisResult, EvidencePacket, RingEvidence};

use crate::aggregator::RingAggregator;
use crate::config::DetectionConfig;
use crate::detector::{
    CycleDetector, DetectorSummary, PatternDetector, ShellChainDetector, SmurfDetector,
};
use crate::error::MuleRadarError;
use crate::graph::{TransactionGraph, TransactionRecord};

pub struct AnalysisEngine {
    config: DetectionConfig,
}

impl AnalysisEngine {
    /// Create an engine, rejecting an invalid configuration up front
    pub fn new(config: DetectionConfig) -> Result<Self, MuleRadarError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn build_graph(
        &self,
        records: &[TransactionRecord],
    ) -> Result<TransactionGraph, MuleRadarError> {
        TransactionGraph::from_records(records, self.config.malformed_row_tolerance)
    }

    /// Build the graph from `records` and analyze it
    pub fn analyze(&self, records: &[TransactionRecord]) -> Result<AnalysisResult, MuleRadarError> {
        let started = Instant::now();
        let graph = self.build_graph(records)?;
        Ok(self.run(&graph, started))
    }

    /// Analyze an already built graph
    pub fn analyze_graph(&self, graph: &TransactionGraph) -> AnalysisResult {
        self.run(graph, Instant::now())
    }

    fn run(&self, graph: &TransactionGraph, started: Instant) -> AnalysisResult {
        let mut cycles = CycleDetector::new(&self.config);
        let mut smurfs = SmurfDetector::new(&self.config);
        let mut shells = ShellChainDetector::new(&self.config);

        if self.config.parallel {
            rayon::join(
                || cycles.detect(graph),
                || rayon::join(|| smurfs.detect(graph), || shells.detect(graph)),
            );
        } else {
            cycles.detect(graph);
            smurfs.detect(graph);
            shells.detect(graph);
        }

        let detectors: [&dyn PatternDetector; 3] = [&cycles, &smurfs, &shells];
        let summaries: Vec<DetectorSummary> = detectors.iter().map(|d| d.summary()).collect();
        let rings = detectors
            .iter()
            .flat_map(|d| d.rings().iter().cloned())
            .collect();

        let (rings, accounts) =
            RingAggregator::new(&self.config.scoring).aggregate(graph, rings);

        AnalysisResult::new(
            graph.metadata(),
            rings,
            accounts,
            summaries,
            graph.skipped_records().to_vec(),
            started.elapsed().as_millis() as u64,
        )
    }
}
