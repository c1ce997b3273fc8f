//! Error types raised by the scoring library.

use thiserror::Error;

/// Errors raised while building tables, cleaning metrics or scoring them.
///
/// Unparseable column names are *not* errors: they are routine noise in
/// telemetry naming and are skipped silently by the cleaner.
#[derive(Debug, Error)]
pub enum OutlierError {
    #[error("Z-scores have not been computed: call compute() first")]
    NotComputed,

    #[error("Invalid dimension pattern '{pattern}': {source}")]
    InvalidDimensionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Column '{column}' has {got} values but the index has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
}

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, OutlierError>;
