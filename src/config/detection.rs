//! Detection engine configuration
//!
//! `DetectionConfig` carries every threshold, score range and resource
//! ceiling the engine uses. Defaults come from [`crate::constants`]; values
//! can be loaded from a TOML file and then overridden field by field through
//! the builder.

use std::path::Path;

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};

use crate::constants::{detection, scoring};
use crate::error::{MuleRadarError, TomlParseError};

/// Thresholds, ceilings and score ranges for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    /// Distinct counterparts required for a fan-in or fan-out hub
    pub smurf_threshold: usize,
    /// Span within which a hub's transfers earn the temporal bonus
    pub temporal_window_hours: f64,
    /// Accounts with at most this many transactions are shells
    pub shell_max_txn_count: usize,
    /// Maximum number of shell-chain rings kept
    pub shell_chain_cap: usize,
    pub shell_min_edges: usize,
    pub shell_max_edges: usize,
    pub cycle_min_len: usize,
    pub cycle_max_len: usize,
    /// Fraction of malformed rows tolerated before the dataset is rejected
    pub malformed_row_tolerance: f64,
    /// Number of top accounts exported for narrative generation
    pub narrative_top_n: usize,
    pub cycle_path_budget: u64,
    pub shell_path_budget: u64,
    pub smurf_node_budget: u64,
    /// Wall-clock ceiling applied to each detector independently
    pub detector_time_budget_ms: Option<u64>,
    /// Run the three detectors concurrently
    pub parallel: bool,
    pub scoring: ScoringConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            smurf_threshold: detection::SMURF_THRESHOLD,
            temporal_window_hours: detection::TEMPORAL_WINDOW_HOURS,
            shell_max_txn_count: detection::SHELL_MAX_TXN_COUNT,
            shell_chain_cap: detection::SHELL_CHAIN_CAP,
            shell_min_edges: detection::SHELL_MIN_EDGES,
            shell_max_edges: detection::SHELL_MAX_EDGES,
            cycle_min_len: detection::CYCLE_MIN_LEN,
            cycle_max_len: detection::CYCLE_MAX_LEN,
            malformed_row_tolerance: detection::MALFORMED_ROW_TOLERANCE,
            narrative_top_n: detection::NARRATIVE_TOP_N,
            cycle_path_budget: detection::CYCLE_PATH_BUDGET,
            shell_path_budget: detection::SHELL_PATH_BUDGET,
            smurf_node_budget: detection::SMURF_NODE_BUDGET,
            detector_time_budget_ms: None,
            parallel: true,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Score ranges and bonus weights for every pattern type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub cycle_base: f64,
    pub cycle_ceiling: f64,
    pub cycle_length_step: f64,
    pub cycle_volume_bonus: f64,
    pub cycle_volume_midpoint: f64,
    pub smurf_base: f64,
    pub smurf_ceiling: f64,
    pub smurf_width_step: f64,
    pub smurf_width_cap: f64,
    pub smurf_temporal_bonus: f64,
    pub shell_base: f64,
    pub shell_ceiling: f64,
    pub shell_length_step: f64,
    pub shell_length_cap: f64,
    pub shell_shared_step: f64,
    pub shell_shared_cap: f64,
    pub membership_weight: f64,
    pub suspicion_ceiling: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cycle_base: scoring::CYCLE_BASE,
            cycle_ceiling: scoring::CYCLE_CEILING,
            cycle_length_step: scoring::CYCLE_LENGTH_STEP,
            cycle_volume_bonus: scoring::CYCLE_VOLUME_BONUS,
            cycle_volume_midpoint: scoring::CYCLE_VOLUME_MIDPOINT,
            smurf_base: scoring::SMURF_BASE,
            smurf_ceiling: scoring::SMURF_CEILING,
            smurf_width_step: scoring::SMURF_WIDTH_STEP,
            smurf_width_cap: scoring::SMURF_WIDTH_CAP,
            smurf_temporal_bonus: scoring::SMURF_TEMPORAL_BONUS,
            shell_base: scoring::SHELL_BASE,
            shell_ceiling: scoring::SHELL_CEILING,
            shell_length_step: scoring::SHELL_LENGTH_STEP,
            shell_length_cap: scoring::SHELL_LENGTH_CAP,
            shell_shared_step: scoring::SHELL_SHARED_STEP,
            shell_shared_cap: scoring::SHELL_SHARED_CAP,
            membership_weight: scoring::MEMBERSHIP_WEIGHT,
            suspicion_ceiling: scoring::SUSPICION_CEILING,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), MuleRadarError> {
        let values = [
            ("cycle_base", self.cycle_base),
            ("cycle_ceiling", self.cycle_ceiling),
            ("cycle_length_step", self.cycle_length_step),
            ("cycle_volume_bonus", self.cycle_volume_bonus),
            ("smurf_base", self.smurf_base),
            ("smurf_ceiling", self.smurf_ceiling),
            ("smurf_width_step", self.smurf_width_step),
            ("smurf_width_cap", self.smurf_width_cap),
            ("smurf_temporal_bonus", self.smurf_temporal_bonus),
            ("shell_base", self.shell_base),
            ("shell_ceiling", self.shell_ceiling),
            ("shell_length_step", self.shell_length_step),
            ("shell_length_cap", self.shell_length_cap),
            ("shell_shared_step", self.shell_shared_step),
            ("shell_shared_cap", self.shell_shared_cap),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(MuleRadarError::config(format!(
                    "scoring.{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let ranges = [
            ("cycle", self.cycle_base, self.cycle_ceiling),
            ("smurf", self.smurf_base, self.smurf_ceiling),
            ("shell", self.shell_base, self.shell_ceiling),
        ];
        for (name, base, ceiling) in ranges {
            if base > ceiling {
                return Err(MuleRadarError::config(format!(
                    "scoring.{name}_base ({base}) exceeds scoring.{name}_ceiling ({ceiling})"
                )));
            }
        }

        if !self.cycle_volume_midpoint.is_finite() || self.cycle_volume_midpoint <= 0.0 {
            return Err(MuleRadarError::config(
                "scoring.cycle_volume_midpoint must be positive",
            ));
        }
        if !self.membership_weight.is_finite() || self.membership_weight <= 0.0 {
            return Err(MuleRadarError::config(
                "scoring.membership_weight must be positive",
            ));
        }
        if !self.suspicion_ceiling.is_finite()
            || self.suspicion_ceiling <= 0.0
            || self.suspicion_ceiling > scoring::SUSPICION_CEILING
        {
            return Err(MuleRadarError::config(format!(
                "scoring.suspicion_ceiling must be in (0, {}], got {}",
                scoring::SUSPICION_CEILING,
                self.suspicion_ceiling
            )));
        }

        Ok(())
    }
}

impl DetectionConfig {
    pub fn builder() -> DetectionConfigBuilder {
        DetectionConfigBuilder::new()
    }

    /// Parse a configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str, file_name: &str) -> Result<Self, MuleRadarError> {
        toml::from_str(content).map_err(|e| {
            let span = e
                .span()
                .map(|span| SourceSpan::new(span.start.into(), span.end - span.start));

            MuleRadarError::TomlParseError(Box::new(TomlParseError {
                file: file_name.to_string(),
                source_code: NamedSource::new(file_name, content.to_string()),
                span,
                source: e,
            }))
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, MuleRadarError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MuleRadarError::FileReadError {
                path: path.to_path_buf(),
                source: e,
            })?;

        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Reject configurations the detectors cannot honor
    ///
    /// Runs before any graph work so a bad configuration fails fast.
    pub fn validate(&self) -> Result<(), MuleRadarError> {
        if self.smurf_threshold == 0 {
            return Err(MuleRadarError::config("smurf_threshold must be positive"));
        }
        if !self.temporal_window_hours.is_finite() || self.temporal_window_hours <= 0.0 {
            return Err(MuleRadarError::config(format!(
                "temporal_window_hours must be a positive number of hours, got {}",
                self.temporal_window_hours
            )));
        }
        if self.shell_max_txn_count == 0 {
            return Err(MuleRadarError::config(
                "shell_max_txn_count must be positive",
            ));
        }
        if self.shell_chain_cap == 0 {
            return Err(MuleRadarError::config("shell_chain_cap must be positive"));
        }
        if self.shell_min_edges == 0 {
            return Err(MuleRadarError::config("shell_min_edges must be positive"));
        }
        if self.shell_max_edges < self.shell_min_edges {
            return Err(MuleRadarError::config(format!(
                "shell_max_edges ({}) is smaller than shell_min_edges ({})",
                self.shell_max_edges, self.shell_min_edges
            )));
        }
        if self.shell_max_edges > detection::SHELL_EDGE_LIMIT {
            return Err(MuleRadarError::config(format!(
                "shell_max_edges must be at most {}, got {}",
                detection::SHELL_EDGE_LIMIT,
                self.shell_max_edges
            )));
        }
        if self.cycle_min_len < detection::CYCLE_MIN_LEN
            || self.cycle_max_len > detection::CYCLE_LEN_LIMIT
            || self.cycle_min_len > self.cycle_max_len
        {
            return Err(MuleRadarError::config(format!(
                "cycle lengths must satisfy {} <= cycle_min_len <= cycle_max_len <= {}, got {}..{}",
                detection::CYCLE_MIN_LEN,
                detection::CYCLE_LEN_LIMIT,
                self.cycle_min_len,
                self.cycle_max_len
            )));
        }
        if !(0.0..=1.0).contains(&self.malformed_row_tolerance) {
            return Err(MuleRadarError::config(format!(
                "malformed_row_tolerance must be a fraction between 0 and 1, got {}",
                self.malformed_row_tolerance
            )));
        }
        if self.narrative_top_n == 0 {
            return Err(MuleRadarError::config("narrative_top_n must be positive"));
        }
        if self.cycle_path_budget == 0 || self.shell_path_budget == 0 || self.smurf_node_budget == 0
        {
            return Err(MuleRadarError::config("search budgets must be positive"));
        }
        if self.detector_time_budget_ms == Some(0) {
            return Err(MuleRadarError::config(
                "detector_time_budget_ms must be positive when set",
            ));
        }

        self.scoring.validate()
    }
}

/// Builder that starts from the documented defaults, or from a loaded file
/// via [`DetectionConfigBuilder::from_config`]
#[derive(Debug, Clone, Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn with_smurf_threshold(mut self, threshold: usize) -> Self {
        self.config.smurf_threshold = threshold;
        self
    }

    pub fn with_temporal_window_hours(mut self, hours: f64) -> Self {
        self.config.temporal_window_hours = hours;
        self
    }

    pub fn with_shell_max_txn_count(mut self, count: usize) -> Self {
        self.config.shell_max_txn_count = count;
        self
    }

    pub fn with_shell_chain_cap(mut self, cap: usize) -> Self {
        self.config.shell_chain_cap = cap;
        self
    }

    pub fn with_shell_edges(mut self, min_edges: usize, max_edges: usize) -> Self {
        self.config.shell_min_edges = min_edges;
        self.config.shell_max_edges = max_edges;
        self
    }

    pub fn with_cycle_lengths(mut self, min_len: usize, max_len: usize) -> Self {
        self.config.cycle_min_len = min_len;
        self.config.cycle_max_len = max_len;
        self
    }

    pub fn with_malformed_row_tolerance(mut self, tolerance: f64) -> Self {
        self.config.malformed_row_tolerance = tolerance;
        self
    }

    pub fn with_narrative_top_n(mut self, top_n: usize) -> Self {
        self.config.narrative_top_n = top_n;
        self
    }

    pub fn with_cycle_path_budget(mut self, budget: u64) -> Self {
        self.config.cycle_path_budget = budget;
        self
    }

    pub fn with_shell_path_budget(mut self, budget: u64) -> Self {
        self.config.shell_path_budget = budget;
        self
    }

    pub fn with_smurf_node_budget(mut self, budget: u64) -> Self {
        self.config.smurf_node_budget = budget;
        self
    }

    pub fn with_detector_time_budget_ms(mut self, budget: Option<u64>) -> Self {
        self.config.detector_time_budget_ms = budget;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }
}

impl crate::common::ConfigBuilder for DetectionConfigBuilder {
    type Config = DetectionConfig;

    fn build(self) -> Result<Self::Config, MuleRadarError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
