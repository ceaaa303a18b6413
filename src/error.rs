use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid TOML syntax in '{file}'")]
#[diagnostic(
    code(mule_radar::toml_parse_error),
    help("Check the TOML syntax near the highlighted position")
)]
pub struct TomlParseError {
    pub file: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("syntax error here")]
    pub span: Option<SourceSpan>,
    #[source]
    pub source: toml::de::Error,
}

/// Why a single transaction record was rejected by the graph builder
///
/// Record errors never abort a run on their own; they are counted against
/// the malformed-row tolerance.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum RecordError {
    #[error("missing sender id")]
    #[diagnostic(code(mule_radar::input::missing_sender))]
    MissingSender,

    #[error("missing receiver id")]
    #[diagnostic(code(mule_radar::input::missing_receiver))]
    MissingReceiver,

    #[error("amount '{value}' is not a number")]
    #[diagnostic(code(mule_radar::input::invalid_amount))]
    InvalidAmount { value: String },

    #[error("amount '{value}' must be greater than zero")]
    #[diagnostic(code(mule_radar::input::non_positive_amount))]
    NonPositiveAmount { value: String },

    #[error("timestamp '{value}' could not be parsed")]
    #[diagnostic(code(mule_radar::input::invalid_timestamp))]
    InvalidTimestamp { value: String },

    #[error("row could not be decoded: {message}")]
    #[diagnostic(code(mule_radar::input::unreadable_row))]
    Unreadable { message: String },
}

#[derive(Error, Debug, Diagnostic)]
pub enum MuleRadarError {
    #[error("Failed to read file '{path}'")]
    #[diagnostic(
        code(mule_radar::io_error),
        help("Check if the file exists and you have read permissions")
    )]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    TomlParseError(Box<TomlParseError>),

    #[error("Malformed transaction record at row {row}")]
    #[diagnostic(
        code(mule_radar::input_error),
        help("Each row needs sender_id, receiver_id, a positive amount and a timestamp")
    )]
    InputError {
        row: usize,
        #[source]
        source: RecordError,
    },

    #[error("Dataset rejected: {message}")]
    #[diagnostic(
        code(mule_radar::dataset_error),
        help("Fix the malformed rows or raise malformed_row_tolerance")
    )]
    DatasetError { message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(mule_radar::config_error),
        help("Check your command arguments and configuration file")
    )]
    ConfigurationError { message: String },

    #[error("CSV error")]
    #[diagnostic(
        code(mule_radar::csv_error),
        help("Check that the input is a comma-separated file with a header row")
    )]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error")]
    #[diagnostic(
        code(mule_radar::json_error),
        help("This is likely an internal error - please report it")
    )]
    Json(#[from] serde_json::Error),

    #[error("String formatting error")]
    #[diagnostic(
        code(mule_radar::fmt_error),
        help("This is likely an internal error - please report it")
    )]
    Fmt(#[from] std::fmt::Error),

    #[error("IO error")]
    #[diagnostic(
        code(mule_radar::io_error),
        help("Check file permissions and disk space")
    )]
    Io(#[from] std::io::Error),
}

impl MuleRadarError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        MuleRadarError::ConfigurationError {
            message: message.into(),
        }
    }

    pub(crate) fn dataset(message: impl Into<String>) -> Self {
        MuleRadarError::DatasetError {
            message: message.into(),
        }
    }
}
