//! Error types for scatter-picker operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while applying host input to a picker widget.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (config files, replay streams).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Host payload could not be decoded.
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A color specifier could not be parsed.
    #[error("invalid color '{spec}': {reason}")]
    InvalidColor {
        /// The offending color specifier, verbatim.
        spec: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Columns of a host table have different lengths.
    #[error("column length mismatch in {table}: '{column}' has {actual} rows, expected {expected}")]
    DataLengthMismatch {
        /// Table name (e.g. `coords`).
        table: &'static str,
        /// Column that disagrees with the first column.
        column: &'static str,
        /// Expected row count.
        expected: usize,
        /// Actual row count.
        actual: usize,
    },

    /// Panel dimensions are unusable.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: f64,
        /// Height value.
        height: f64,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),
}
