use std::path::PathBuf;
use thiserror::Error;

use crate::models::City;

/// Failures while reading a city's trip source.
///
/// Fatal to the current load; the caller may retry with other criteria.
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// The CSV file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file (bad quoting, ragged rows, bad UTF-8).
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("Missing required column \"{column}\" in {path}")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A row carries a value that cannot be interpreted.
    #[error("Malformed record at line {line} of {path}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// No source file is configured for the city.
    #[error("No data source configured for {0}")]
    UnmappedCity(City),
}

/// A metric has no defined value under the current filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No {metric} data available for the current filter")]
pub struct EmptyDatasetError {
    pub metric: &'static str,
}

impl EmptyDatasetError {
    pub fn new(metric: &'static str) -> Self {
        Self { metric }
    }
}

/// All errors produced by the bikeshare explorer.
#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    EmptyDataset(#[from] EmptyDatasetError),

    /// A city name is not one of the supported cities.
    #[error("Invalid city: {0}")]
    InvalidCity(String),

    /// A month is neither "all" nor one of January through June.
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// A weekday is neither "all" nor a day name.
    #[error("Invalid day: {0}")]
    InvalidWeekday(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed or written.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;
