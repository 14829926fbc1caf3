//! Error types for vericast-records.

use std::path::PathBuf;

/// Error type for all fallible operations in the vericast-records crate.
///
/// Covers file-system failures, Parquet/Arrow errors, schema mismatches in
/// files produced by ingestion, and records that cannot be persisted.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a file-system failure.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a required column is not present.
    #[error("column '{column}' not found")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// Returned when a column has an unexpected Arrow type.
    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        /// Name of the column.
        column: String,
        /// Expected Arrow type.
        expected: &'static str,
        /// Actual Arrow type.
        found: String,
    },

    /// Returned when a stored label (operator or outcome) cannot be parsed.
    #[error("invalid label in column '{column}': {reason}")]
    InvalidLabel {
        /// Name of the column.
        column: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a timestamp is out of the representable range.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time issue.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },
}

impl From<parquet::errors::ParquetError> for RecordsError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        RecordsError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for RecordsError {
    fn from(e: arrow::error::ArrowError) -> Self {
        RecordsError::Parquet {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_file_not_found() {
        let err = RecordsError::FileNotFound {
            path: PathBuf::from("/tmp/missing.parquet"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.parquet");
    }

    #[test]
    fn test_display_io() {
        let err = RecordsError::Io {
            path: PathBuf::from("/data/history"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "i/o error on /data/history: permission denied"
        );
    }

    #[test]
    fn test_display_parquet() {
        let err = RecordsError::Parquet {
            reason: "corrupt footer".to_string(),
        };
        assert_eq!(err.to_string(), "parquet error: corrupt footer");
    }

    #[test]
    fn test_display_missing_column() {
        let err = RecordsError::MissingColumn {
            column: "obs_time".to_string(),
        };
        assert_eq!(err.to_string(), "column 'obs_time' not found");
    }

    #[test]
    fn test_display_column_type() {
        let err = RecordsError::ColumnType {
            column: "value".to_string(),
            expected: "Float64",
            found: "Utf8".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "column 'value' has type Utf8, expected Float64"
        );
    }

    #[test]
    fn test_display_validation() {
        let err = RecordsError::Validation {
            count: 2,
            details: "error is NaN; distance_km is inf".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): error is NaN; distance_km is inf"
        );
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<RecordsError>();
    }
}
