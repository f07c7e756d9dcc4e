/// Structured error types for docketload-core.
///
/// Everything here describes a problem with one source file. The loader
/// treats any of these as "abandon this file, keep going with the next".
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error raised while reading a source file or matching it to a table
#[derive(Error, Debug)]
pub enum SourceError {
    /// Source file does not exist
    #[error("Source file not found: {path:?}")]
    NotFound { path: PathBuf },

    /// Source file exists but could not be read
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV framing error (bad quoting, invalid UTF-8, ...)
    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row carries more fields than the header declares
    #[error("Row {row} in {path:?} has {found} fields but the header has {expected}")]
    RaggedRow {
        path: PathBuf,
        row: usize,
        found: usize,
        expected: usize,
    },

    /// Header names a column the target table does not have
    #[error("Unknown column '{column}' for table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Header names the same column twice
    #[error("Duplicate column '{column}' in header for table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Header lacks the table's identity column
    #[error("Header is missing identity column '{column}' for table '{table}'")]
    MissingIdentity { table: String, column: String },
}

/// Result type alias for docketload-core operations
pub type Result<T> = std::result::Result<T, SourceError>;

impl SourceError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn duplicate_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn missing_identity(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingIdentity {
            table: table.into(),
            column: column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::missing_identity("cases", "case_id");
        assert_eq!(
            err.to_string(),
            "Header is missing identity column 'case_id' for table 'cases'"
        );

        let err = SourceError::not_found("/tmp/cases.csv");
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("/tmp/cases.csv"));
    }

    #[test]
    fn test_ragged_row_display() {
        let err = SourceError::RaggedRow {
            path: PathBuf::from("tasks.csv"),
            row: 4,
            found: 7,
            expected: 6,
        };
        assert_eq!(
            err.to_string(),
            "Row 4 in \"tasks.csv\" has 7 fields but the header has 6"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = SourceError::io("cases.csv", io_err);
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.source().is_some());
    }
}
