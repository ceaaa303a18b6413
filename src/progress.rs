use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use console::{Term, style};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::constants::progress::{SPINNER_FRAMES, TICK_INTERVAL};
use crate::graph::GraphMetadata;
use crate::utils::string::pluralize;

// Progress bar style templates as constants
const PROGRESS_BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {per_sec}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

/// Styled status output on stderr, only created when stderr is a terminal
pub struct ProgressReporter {
    term: Term,
    spinner_position: AtomicUsize,
    multi_progress: MultiProgress,
    current_bar: Option<ProgressBar>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            spinner_position: AtomicUsize::new(0),
            multi_progress: MultiProgress::new(),
            current_bar: None,
        }
    }

    /// Reporter for interactive sessions, `None` when output is redirected
    pub fn for_terminal() -> Option<Self> {
        Term::stderr().is_term().then(Self::new)
    }

    pub fn create_progress_bar(&mut self, len: u64, message: &str) -> ProgressBar {
        let pb = self.multi_progress.add(ProgressBar::new(len));
        let bar_style = ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        pb.set_style(bar_style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    pub fn create_spinner(&mut self, message: &str) -> ProgressBar {
        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        let spinner_style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_FRAMES);
        pb.set_style(spinner_style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    fn next_frame(&self) -> &'static str {
        let pos = self.spinner_position.fetch_add(1, Ordering::Relaxed) % SPINNER_FRAMES.len();
        SPINNER_FRAMES[pos]
    }

    pub fn start_loading(&mut self, file_count: usize) -> ProgressBar {
        let _ = self.term.clear_line();
        eprintln!(
            "{} Reading {} transaction {}...",
            style("📂").cyan(),
            style(file_count).yellow(),
            pluralize("file", file_count)
        );
        let pb = self.create_progress_bar(file_count as u64, "Loading records");
        self.current_bar = Some(pb.clone());
        pb
    }

    pub fn loaded_file(&self, path: &Path) {
        if let Some(ref pb) = self.current_bar {
            pb.set_message(format!("Loaded: {}", path.display()));
            pb.inc(1);
        } else {
            let _ = self.term.clear_line();
            eprint!(
                "\r{} Loaded: {}... ",
                style(self.next_frame()).cyan(),
                style(path.display()).dim()
            );
        }
    }

    pub fn finish_loading(&mut self, record_count: usize) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        let _ = self.term.clear_line();
        eprintln!(
            "\r{} Loaded {} {}",
            style("✓").green(),
            style(record_count).yellow().bold(),
            pluralize("record", record_count)
        );
    }

    pub fn start_graph_building(&mut self) {
        let spinner = self.create_spinner("Building transaction graph...");
        self.current_bar = Some(spinner);
    }

    pub fn finish_graph_building(&mut self, metadata: &GraphMetadata) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        eprintln!(
            "{} Graph built: {} {}, {} {}",
            style("✓").green(),
            style(metadata.account_count).yellow().bold(),
            pluralize("account", metadata.account_count),
            style(metadata.transaction_count).yellow().bold(),
            pluralize("transaction", metadata.transaction_count)
        );
        if metadata.records_skipped > 0 {
            eprintln!(
                "{} Skipped {} malformed {}",
                style("⚠").yellow(),
                style(metadata.records_skipped).yellow(),
                pluralize("row", metadata.records_skipped)
            );
        }
    }

    pub fn start_detection(&mut self) {
        eprintln!("\n{} Scanning for laundering patterns...", style("📡").yellow());
        let spinner = self.create_spinner("Running cycle, smurfing and shell chain detectors...");
        self.current_bar = Some(spinner);
    }

    pub fn finish_detection(&mut self, rings_found: usize, truncated: bool) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        if rings_found == 0 {
            eprintln!("{} No suspicious rings detected", style("✓").green().bold());
        } else {
            eprintln!(
                "{} Found {} fraud {}",
                style("⚠").yellow().bold(),
                style(rings_found).red().bold(),
                pluralize("ring", rings_found)
            );
        }
        if truncated {
            eprintln!(
                "{} Detection was truncated; results are partial",
                style("⚠").yellow()
            );
        }
    }
}
