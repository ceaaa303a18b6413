//! # Configuration Module
//!
//! Detection settings plus one configuration per CLI command, each with a
//! builder in the same style.
//!
//! ## Configurations
//!
//! - **DetectionConfig**: thresholds, score ranges and resource ceilings,
//!   loadable from TOML
//! - **ScanConfig**: the `scan` command, which reports rings and accounts
//! - **GraphOptions**: the `graph` command, which exports the graph payload
//! - **EvidenceConfig**: the `evidence` command, which exports evidence
//!   packets for narrative generation
//!
//! ## Example
//!
//! ```
//! use mule_radar::cli::{GraphFormat, OutputFormat};
//! use mule_radar::common::ConfigBuilder;
//! use mule_radar::config::{DetectionConfig, GraphOptions, ScanConfig};
//!
//! let detection = DetectionConfig::builder()
//!     .with_smurf_threshold(8)
//!     .with_cycle_lengths(3, 6)
//!     .build()
//!     .unwrap();
//!
//! let scan = ScanConfig::builder()
//!     .with_paths(vec!["transactions.csv".into()])
//!     .with_format(OutputFormat::Json)
//!     .with_fail_on_rings(true)
//!     .with_detection(detection)
//!     .build()
//!     .unwrap();
//! assert_eq!(scan.detection.smurf_threshold, 8);
//!
//! let graph = GraphOptions::builder()
//!     .with_paths(vec!["transactions.csv".into()])
//!     .with_format(GraphFormat::Dot)
//!     .build()
//!     .unwrap();
//! assert!(!graph.suspicious_only);
//! ```

pub mod detection;
pub mod evidence;
pub mod graph;
pub mod scan;

pub use detection::{DetectionConfig, DetectionConfigBuilder, ScoringConfig};
pub use evidence::EvidenceConfig;
pub use graph::GraphOptions;
pub use scan::ScanConfig;
