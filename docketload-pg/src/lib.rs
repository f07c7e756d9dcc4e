//! PostgreSQL side of docketload: connection, schema, row loading and the
//! dashboard view.

pub mod config;
pub mod connection;
pub mod error;
pub mod inputs;
pub mod insights;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod ui;

pub use connection::{close, connect, ConnectionArgs, ConnectionParams};
pub use error::{PgError, PgResult};
pub use insights::{run_insights, InsightsArgs};
pub use loader::{load_rows, load_table, LoadSummary, RowFailure, RowOutcome, TableOutcome};
pub use pipeline::{run_load, LoadArgs, RunReport, TableStatus};
pub use schema::init_schema;
