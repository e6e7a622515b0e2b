//! Error types for ride data loading

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while discovering or reading ride files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required column is absent from the header row
    #[error("{file}: no {column} column in header")]
    MissingColumn { file: String, column: &'static str },

    /// Nothing could be loaded from the data directory
    #[error("no ride data files could be loaded from {}", .0.display())]
    NoData(PathBuf),
}

/// Result type alias for data operations
pub type Result<T> = std::result::Result<T, DataError>;
