//! Error types for docketload-pg

use docketload_core::SourceError;
use thiserror::Error;

pub type PgResult<T> = Result<T, PgError>;

#[derive(Error, Debug)]
pub enum PgError {
    /// Required connection parameters were not supplied
    #[error("missing connection parameters: {}", .missing.join(", "))]
    Config { missing: Vec<&'static str> },

    /// The initial connection could not be established
    #[error("could not connect to {host}:{port}/{database}: {source}")]
    Connection {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: sqlx::Error,
    },

    /// `CREATE TABLE` for one of the target tables failed
    #[error("failed to create table '{table}': {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Source file could not be read or matched to its table
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Transaction bookkeeping (begin, savepoint, commit) failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_every_missing_variable() {
        let err = PgError::Config {
            missing: vec!["DB_HOST", "DB_PASSWORD"],
        };
        assert_eq!(
            err.to_string(),
            "missing connection parameters: DB_HOST, DB_PASSWORD"
        );
    }

    #[test]
    fn source_errors_pass_through() {
        let err: PgError = SourceError::not_found("cases.csv").into();
        assert!(matches!(err, PgError::Source(_)));
        assert!(err.to_string().contains("cases.csv"));
    }

    #[test]
    fn schema_error_names_table() {
        let err = PgError::Schema {
            table: "tasks",
            source: sqlx::Error::PoolClosed,
        };
        assert!(err.to_string().starts_with("failed to create table 'tasks'"));
    }
}
