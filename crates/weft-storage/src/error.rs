//! Storage error types.

use thiserror::Error;

/// Errors surfaced by drivers and storage middleware.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The underlying driver reported a failure.
    #[error("driver error: {0}")]
    Driver(String),

    /// A single-row query matched nothing; reported at scan time.
    #[error("no rows in result set")]
    NoRows,

    /// The scan destination does not match the row shape.
    #[error("scan expected {expected} columns, destination has {got}")]
    ColumnMismatch {
        /// Columns in the row.
        expected: usize,
        /// Slots in the destination.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(StorageError::NoRows.to_string(), "no rows in result set");
        assert_eq!(
            StorageError::ColumnMismatch { expected: 3, got: 1 }.to_string(),
            "scan expected 3 columns, destination has 1"
        );
    }
}
