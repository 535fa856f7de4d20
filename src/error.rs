//! Error types for the bikeshare pipeline.
//!
//! Registry lookups and filter parsing fail with [`Error::NotFound`] or
//! [`Error::InvalidFilter`]; anything that goes wrong while reading a city's
//! source file is wrapped as [`Error::Load`] with the path that failed.
//! An empty filter result is *not* an error.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for library operations.
#[derive(Error, Debug)]
pub enum Error {
    /// City key outside the fixed set of datasets.
    #[error("unknown city {0:?} (expected chicago, new york or washington)")]
    NotFound(String),

    /// Month or day filter that is not part of the accepted universe.
    #[error("invalid {field} filter {value:?} (expected one of: {expected})")]
    InvalidFilter {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// The source could not be read or parsed. Fatal for that load attempt.
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
}

/// Why a source file could not be turned into a trip collection.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV, including rows with the wrong number of fields.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),

    /// `row` is the 1-based data row (the header is not counted).
    #[error("row {row}: unparsable start time {value:?}")]
    StartTime { row: u64, value: String },
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
