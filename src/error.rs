/// Error types shared by the summary and rename tools
///
/// The library never terminates the process; every failure surfaces as a
/// `ToolkitError` and the binaries decide how to report it.

use std::path::PathBuf;

/// Errors raised by the toolkit library
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    /// Input file does not exist (or is not a regular file)
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Target of a rename run is missing or not a directory
    #[error("'{}' is not a valid folder.", .0.display())]
    NotADirectory(PathBuf),

    /// Prefix that cannot be glued onto a file name
    #[error("invalid prefix {0:?}: {1}")]
    InvalidPrefix(String, &'static str),

    /// Columns handed to `Table::new` disagree on their row count
    #[error("column '{column}' has {found} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Configuration file problems
    #[error("configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Parse or compute failure inside polars (malformed CSV rows included)
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, ToolkitError>;
