//! The `load` command: connect → ensure schema → load each table → close.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use docketload_core::{read_csv, InsertStatement, TableKind};
use sqlx::postgres::PgConnection;
use tracing::{error, info, warn};

use crate::config::DocketloadConfig;
use crate::connection::{self, ConnectionArgs, ConnectionParams};
use crate::inputs::{InputArgs, InputPaths};
use crate::loader::{load_table, LoadSummary, TableOutcome};
use crate::schema::init_schema;
use crate::ui;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableArg {
    Cases,
    BillableHours,
    Tasks,
}

impl From<TableArg> for TableKind {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Cases => TableKind::Cases,
            TableArg::BillableHours => TableKind::BillableHours,
            TableArg::Tasks => TableKind::Tasks,
        }
    }
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Only load these tables (repeatable); load order stays cases, billable-hours, tasks
    #[arg(long = "table", value_enum, value_name = "TABLE")]
    pub tables: Vec<TableArg>,

    /// Read and normalize the sources without touching the database
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Disable the per-table progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// Selected tables in load order. No selection means all of them.
pub fn selected_tables(args: &[TableArg]) -> Vec<TableKind> {
    if args.is_empty() {
        return TableKind::LOAD_ORDER.to_vec();
    }
    let wanted: Vec<TableKind> = args.iter().copied().map(TableKind::from).collect();
    TableKind::LOAD_ORDER
        .into_iter()
        .filter(|kind| wanted.contains(kind))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Loaded(LoadSummary),
    Empty,
    /// Dry run: rows found and cells normalized to null
    Scanned { rows: usize, null_cells: usize },
    /// Source abandoned; the message is the cause
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: TableKind,
    pub status: TableStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tables: Vec<TableReport>,
}

impl RunReport {
    fn push(&mut self, table: TableKind, status: TableStatus) {
        self.tables.push(TableReport { table, status });
    }

    pub fn rows_failed(&self) -> usize {
        self.tables
            .iter()
            .map(|t| match &t.status {
                TableStatus::Loaded(summary) => summary.failed(),
                _ => 0,
            })
            .sum()
    }

    pub fn sources_failed(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| matches!(t.status, TableStatus::Failed(_)))
            .count()
    }

    /// One log line per table
    pub fn log(&self) {
        for entry in &self.tables {
            match &entry.status {
                TableStatus::Loaded(s) => info!(
                    "{}: {} rows found, {} inserted, {} skipped as duplicate, {} failed",
                    entry.table,
                    s.rows_found,
                    s.inserted,
                    s.skipped,
                    s.failed()
                ),
                TableStatus::Empty => info!("{}: empty source, nothing loaded", entry.table),
                TableStatus::Scanned { rows, null_cells } => info!(
                    "dry run: {} has {} rows ({} null cells)",
                    entry.table, rows, null_cells
                ),
                TableStatus::Failed(cause) => {
                    info!("{}: source failed ({})", entry.table, cause)
                }
            }
        }
    }
}

pub async fn run_load(args: LoadArgs) -> Result<RunReport> {
    let config = DocketloadConfig::load();
    let inputs = InputPaths::resolve(&args.inputs, &config.inputs);
    let tables = selected_tables(&args.tables);
    inputs.check(&tables);

    if args.dry_run {
        let report = scan_sources(&inputs, &tables);
        report.log();
        return Ok(report);
    }

    let params = ConnectionParams::resolve(&args.connection)
        .context("incomplete connection configuration")?;
    let mut conn = connection::connect(&params)
        .await
        .context("failed to connect to PostgreSQL")?;

    let show_progress = config.load.show_progress && !args.no_progress;
    let report = load_tables(&mut conn, &inputs, &tables, show_progress).await;
    connection::close(conn).await;

    report.log();
    info!(
        failed_rows = report.rows_failed(),
        failed_sources = report.sources_failed(),
        "all done"
    );
    Ok(report)
}

/// Schema, then every selected table in order. Never fails: schema and
/// source errors are logged and recorded, and the run moves on.
pub async fn load_tables(
    conn: &mut PgConnection,
    inputs: &InputPaths,
    tables: &[TableKind],
    show_progress: bool,
) -> RunReport {
    if let Err(err) = init_schema(conn).await {
        error!(error = %err, "schema initialization failed; continuing with load");
    }

    let mut report = RunReport::default();
    for &kind in tables {
        let path = inputs.path_for(kind);
        let pb = if show_progress {
            ui::row_progress(kind.spec().name)
        } else {
            None
        };

        let status = match load_table(conn, kind.spec(), path, pb.as_ref()).await {
            Ok(TableOutcome::Loaded(summary)) => TableStatus::Loaded(summary),
            Ok(TableOutcome::Empty) => TableStatus::Empty,
            Err(err) => {
                error!(table = %kind, path = %path.display(), error = %err, "failed to load source");
                TableStatus::Failed(err.to_string())
            }
        };
        ui::finish(pb);
        report.push(kind, status);
    }
    report
}

/// Dry run: normalize each source and check its header against the table.
pub fn scan_sources(inputs: &InputPaths, tables: &[TableKind]) -> RunReport {
    let mut report = RunReport::default();
    for &kind in tables {
        let path = inputs.path_for(kind);
        let status = match read_csv(path) {
            Ok(rows) if rows.is_empty() => TableStatus::Empty,
            Ok(rows) => match InsertStatement::for_headers(kind.spec(), rows.headers()) {
                Ok(_) => TableStatus::Scanned {
                    rows: rows.len(),
                    null_cells: rows.null_cells(),
                },
                Err(err) => TableStatus::Failed(err.to_string()),
            },
            Err(err) => TableStatus::Failed(err.to_string()),
        };
        if let TableStatus::Failed(cause) = &status {
            warn!(table = %kind, path = %path.display(), "{}", cause);
        }
        report.push(kind, status);
    }
    report
}
