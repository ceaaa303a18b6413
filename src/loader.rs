//! CSV dataset discovery and decoding
//!
//! The loader only decodes rows into [`TransactionRecord`]s; deciding whether
//! a record is usable is left to the graph builder.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{MuleRadarError, RecordError};
use crate::graph::TransactionRecord;
use crate::progress::ProgressReporter;

/// Columns every dataset must provide; `transaction_id` is optional
pub const REQUIRED_COLUMNS: &[&str] = &["sender_id", "receiver_id", "amount", "timestamp"];

const TRANSACTION_ID_COLUMN: &str = "transaction_id";

/// One decoded row, or the reason it could not be decoded
pub type DatasetRow = Result<TransactionRecord, RecordError>;

/// Rows read from one or more CSV files, in file then row order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub files: Vec<PathBuf>,
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Column positions resolved from a header row
struct ColumnMap {
    transaction_id: Option<usize>,
    sender_id: usize,
    receiver_id: usize,
    amount: usize,
    timestamp: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self, MuleRadarError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(MuleRadarError::dataset(format!(
                "'{}' is missing required column(s): {}",
                path.display(),
                missing.join(", ")
            )));
        }

        let required = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            transaction_id: position(TRANSACTION_ID_COLUMN),
            sender_id: required("sender_id"),
            receiver_id: required("receiver_id"),
            amount: required("amount"),
            timestamp: required("timestamp"),
        })
    }

    fn decode(&self, row: &csv::StringRecord) -> TransactionRecord {
        let field = |idx: usize| row.get(idx).unwrap_or_default().to_string();
        TransactionRecord {
            transaction_id: self.transaction_id.map(field).unwrap_or_default(),
            sender_id: field(self.sender_id),
            receiver_id: field(self.receiver_id),
            amount: field(self.amount),
            timestamp: field(self.timestamp),
        }
    }
}

#[derive(Debug, Default)]
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Expand `paths` into the CSV files to read, sorted for stable row order
    ///
    /// Files are taken as given; directories are walked for `*.csv` files.
    pub fn discover(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, MuleRadarError> {
        let mut files = Vec::new();

        for path in paths {
            if !path.exists() {
                return Err(MuleRadarError::dataset(format!(
                    "input path '{}' does not exist",
                    path.display()
                )));
            }

            if path.is_file() {
                files.push(path.clone());
                continue;
            }

            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_entry(|e| {
                    let name = e.file_name();
                    name != ".git" && name != "target" && name != "node_modules"
                })
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| {
                    e.path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
                })
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        }

        files.dedup();
        if files.is_empty() {
            return Err(MuleRadarError::dataset(
                "no CSV files found in the given paths",
            ));
        }

        Ok(files)
    }

    /// Decode every row of one CSV file
    pub fn read_file(&self, path: &Path) -> Result<Vec<DatasetRow>, MuleRadarError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let columns = ColumnMap::from_headers(reader.headers()?, path)?;

        Ok(reader
            .records()
            .map(|row| match row {
                Ok(row) => Ok(columns.decode(&row)),
                Err(err) => Err(RecordError::Unreadable {
                    message: err.to_string(),
                }),
            })
            .collect())
    }

    /// Discover and read every input file, files in parallel
    pub fn load(
        &self,
        paths: &[PathBuf],
        mut progress: Option<&mut ProgressReporter>,
    ) -> Result<Dataset, MuleRadarError> {
        let files = self.discover(paths)?;

        if let Some(p) = progress.as_mut() {
            p.start_loading(files.len());
        }
        let reporter = progress.as_deref();

        let per_file: Vec<Vec<DatasetRow>> = files
            .par_iter()
            .map(|path| {
                let rows = self.read_file(path)?;
                if let Some(p) = reporter {
                    p.loaded_file(path);
                }
                Ok(rows)
            })
            .collect::<Result<_, MuleRadarError>>()?;

        let rows: Vec<DatasetRow> = per_file.into_iter().flatten().collect();
        if let Some(p) = progress {
            p.finish_loading(rows.len());
        }

        Ok(Dataset { files, rows })
    }
}
