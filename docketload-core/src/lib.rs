pub mod error;
pub mod normalize;
pub mod tables;

pub use error::{Result, SourceError};
pub use normalize::{is_null_marker, read_csv, read_csv_from, RowSet, NULL_MARKERS};
pub use tables::{
    Column, ColumnType, InsertStatement, TableKind, TableSpec, BILLABLE_HOURS, CASES, TASKS,
};
