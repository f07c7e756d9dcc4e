//! Column contracts for the three target tables.
//!
//! The contracts are static: DDL and insert statements are both generated
//! from them, so the schema and the loader can never disagree on a type.

use std::collections::HashSet;
use std::fmt;

use crate::error::{Result, SourceError};

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Date,
}

impl ColumnType {
    /// SQL spelling used both in `CREATE TABLE` and in parameter casts
    pub const fn sql(self) -> &'static str {
        match self {
            ColumnType::Integer => "INT",
            ColumnType::Float => "FLOAT",
            ColumnType::Text => "TEXT",
            ColumnType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

/// One target table: name, identity column, ordered column list and the
/// file name it is loaded from by default.
#[derive(Debug, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub identity: &'static str,
    pub columns: &'static [Column],
    pub source_file: &'static str,
}

pub static CASES: TableSpec = TableSpec {
    name: "cases",
    identity: "case_id",
    columns: &[
        col("case_id", ColumnType::Integer),
        col("client_name", ColumnType::Text),
        col("lawyer", ColumnType::Text),
        col("practice_area", ColumnType::Text),
        col("status", ColumnType::Text),
        col("start_date", ColumnType::Date),
        col("due_date", ColumnType::Date),
        col("end_date", ColumnType::Date),
    ],
    source_file: "cases.csv",
};

pub static BILLABLE_HOURS: TableSpec = TableSpec {
    name: "billable_hours",
    identity: "entry_id",
    columns: &[
        col("entry_id", ColumnType::Integer),
        col("lawyer", ColumnType::Text),
        col("case_id", ColumnType::Integer),
        col("date", ColumnType::Date),
        col("hours_logged", ColumnType::Float),
        col("billed", ColumnType::Text),
    ],
    source_file: "billable_hours.csv",
};

pub static TASKS: TableSpec = TableSpec {
    name: "tasks",
    identity: "task_id",
    columns: &[
        col("task_id", ColumnType::Integer),
        col("case_id", ColumnType::Integer),
        col("task_description", ColumnType::Text),
        col("assigned_to", ColumnType::Text),
        col("due_date", ColumnType::Date),
        col("completed", ColumnType::Text),
    ],
    source_file: "tasks.csv",
};

/// The three loadable entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    Cases,
    BillableHours,
    Tasks,
}

impl TableKind {
    /// Fixed load order: cases first, then the tables that reference it.
    pub const LOAD_ORDER: [TableKind; 3] =
        [TableKind::Cases, TableKind::BillableHours, TableKind::Tasks];

    pub fn spec(self) -> &'static TableSpec {
        match self {
            TableKind::Cases => &CASES,
            TableKind::BillableHours => &BILLABLE_HOURS,
            TableKind::Tasks => &TASKS,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl TableSpec {
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        let columns: &'static [Column] = self.columns;
        columns.iter().find(|c| c.name == name)
    }

    /// `CREATE TABLE IF NOT EXISTS` for this contract. Identity column is the
    /// primary key; no other constraints.
    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.name == self.identity {
                    format!("    {} {} PRIMARY KEY", quote_ident(c.name), c.ty.sql())
                } else {
                    format!("    {} {}", quote_ident(c.name), c.ty.sql())
                }
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            quote_ident(self.name),
            columns.join(",\n")
        )
    }
}

/// Insert-or-skip statement bound to one source header.
///
/// Placeholders follow header order. Every value is bound as text and cast
/// to the column type server-side, so a malformed value fails its own row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub sql: String,
    pub columns: Vec<&'static Column>,
    /// Position of the identity column within the header
    pub identity_index: usize,
}

impl InsertStatement {
    pub fn for_headers(spec: &TableSpec, headers: &[String]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(headers.len());

        for header in headers {
            let column = spec
                .column(header)
                .ok_or_else(|| SourceError::unknown_column(spec.name, header.as_str()))?;
            if !seen.insert(column.name) {
                return Err(SourceError::duplicate_column(spec.name, column.name));
            }
            columns.push(column);
        }

        let identity_index = columns
            .iter()
            .position(|c| c.name == spec.identity)
            .ok_or_else(|| SourceError::missing_identity(spec.name, spec.identity))?;

        let names: Vec<String> = columns.iter().map(|c| quote_ident(c.name)).collect();
        let placeholders: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(idx, c)| format!("${}::{}", idx + 1, c.ty.sql()))
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO NOTHING",
            quote_ident(spec.name),
            names.join(", "),
            placeholders.join(", "),
            quote_ident(spec.identity)
        );

        Ok(Self {
            sql,
            columns,
            identity_index,
        })
    }
}
