//! Error types for the data-loader crate.
//!
//! Every variant here is a startup failure: once a `Dataset` has been
//! built it is never mutated, so nothing in this crate can fail per request.

use thiserror::Error;

/// Errors that can occur while loading the catalog and similarity matrix
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Two catalog rows share a title, which would make title lookup ambiguous
    #[error("Duplicate title '{title}' at rows {first_row} and {second_row}")]
    DuplicateTitle {
        title: String,
        first_row: usize,
        second_row: usize,
    },

    /// Catalog and similarity matrix do not line up row for row
    #[error("Inconsistent dataset: {reason}")]
    InconsistentDataset { reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
