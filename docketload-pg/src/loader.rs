//! Table loader
//!
//! Per table: read → normalize → insert each row → commit once.
//!
//! Rows share one table transaction, and every row runs inside its own
//! savepoint. A failing row rolls back to its savepoint only, so the
//! transaction stays usable for the rows after it. Duplicate identities are
//! skipped by `ON CONFLICT DO NOTHING` and show up as zero affected rows.

use std::path::Path;

use docketload_core::{read_csv, InsertStatement, RowSet, TableSpec};
use indicatif::ProgressBar;
use sqlx::postgres::{PgConnection, Postgres};
use sqlx::{Acquire, Transaction};
use tracing::{info, warn};

use crate::error::PgResult;

/// Terminal state of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Inserted,
    SkippedDuplicate,
    Failed { cause: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based position among the data rows of the source
    pub ordinal: usize,
    /// Identity value of the row, if it had one
    pub identity: Option<String>,
    pub cause: String,
}

/// Per-file accounting of row outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: &'static str,
    pub rows_found: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

impl LoadSummary {
    pub fn new(table: &'static str, rows_found: usize) -> Self {
        Self {
            table,
            rows_found,
            inserted: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, ordinal: usize, identity: Option<String>, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Inserted => self.inserted += 1,
            RowOutcome::SkippedDuplicate => self.skipped += 1,
            RowOutcome::Failed { cause } => self.failures.push(RowFailure {
                ordinal,
                identity,
                cause,
            }),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// What happened to one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Loaded(LoadSummary),
    /// Zero data rows; nothing was attempted
    Empty,
}

/// Read `path` and load it into the table described by `spec`.
///
/// Errors mean the file was abandoned (unreadable source, unusable header,
/// or the table transaction itself failed). Row failures are not errors;
/// they land in the returned summary.
pub async fn load_table(
    conn: &mut PgConnection,
    spec: &'static TableSpec,
    path: &Path,
    progress: Option<&ProgressBar>,
) -> PgResult<TableOutcome> {
    let rows = read_csv(path)?;
    info!(
        table = spec.name,
        path = %path.display(),
        rows = rows.len(),
        "loading source"
    );

    if let Some(pb) = progress {
        pb.set_length(rows.len() as u64);
    }

    if rows.is_empty() {
        warn!(table = spec.name, path = %path.display(), "source is empty; skipping");
        return Ok(TableOutcome::Empty);
    }

    let summary = load_rows(conn, spec, &rows, progress).await?;
    info!(
        table = spec.name,
        rows = summary.rows_found,
        inserted = summary.inserted,
        skipped = summary.skipped,
        failed = summary.failed(),
        "finished loading table"
    );
    Ok(TableOutcome::Loaded(summary))
}

/// Insert every row of an already normalized row set, then commit once.
pub async fn load_rows(
    conn: &mut PgConnection,
    spec: &'static TableSpec,
    rows: &RowSet,
    progress: Option<&ProgressBar>,
) -> PgResult<LoadSummary> {
    let statement = InsertStatement::for_headers(spec, rows.headers())?;
    let mut summary = LoadSummary::new(spec.name, rows.len());
    let mut tx = conn.begin().await?;

    for (idx, row) in rows.rows().iter().enumerate() {
        let ordinal = idx + 1;
        let identity = row.get(statement.identity_index).cloned().flatten();
        let outcome = insert_row(&mut tx, &statement, row).await?;

        if let RowOutcome::Failed { cause } = &outcome {
            warn!(
                table = spec.name,
                row = ordinal,
                identity = identity.as_deref().unwrap_or("<null>"),
                error = %cause,
                "row insert failed"
            );
        }
        summary.record(ordinal, identity, outcome);

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    tx.commit().await?;
    Ok(summary)
}

async fn insert_row(
    tx: &mut Transaction<'_, Postgres>,
    statement: &InsertStatement,
    row: &[Option<String>],
) -> PgResult<RowOutcome> {
    let mut savepoint = tx.begin().await?;

    let mut query = sqlx::query(&statement.sql);
    for value in row {
        query = query.bind(value.as_deref());
    }

    match query.execute(&mut *savepoint).await {
        Ok(done) => {
            savepoint.commit().await?;
            if done.rows_affected() == 0 {
                Ok(RowOutcome::SkippedDuplicate)
            } else {
                Ok(RowOutcome::Inserted)
            }
        }
        Err(err) => {
            savepoint.rollback().await?;
            Ok(RowOutcome::Failed {
                cause: describe(&err),
            })
        }
    }
}

fn describe(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => format!("{} (SQLSTATE {})", db.message(), code),
            None => db.message().to_owned(),
        },
        other => other.to_string(),
    }
}
