//! Connection manager
//!
//! One `PgConnection` per run, no pool. The connection is opened once,
//! handed to the schema initializer and loader by `&mut`, and closed once
//! at the end of the run.

use std::fmt;

use clap::Args;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{info, warn};

use crate::error::{PgError, PgResult};

/// Connection flags; each one falls back to its `DB_*` environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// PostgreSQL host
    #[arg(long, env = "DB_HOST")]
    pub host: Option<String>,

    /// PostgreSQL port [default: 5432]
    #[arg(long, env = "DB_PORT")]
    pub port: Option<u16>,

    /// Database name
    #[arg(long = "database", env = "DB_NAME")]
    pub database: Option<String>,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Fully resolved connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Blank counts as missing; anything else is passed through untouched.
fn present(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

impl ConnectionParams {
    pub const DEFAULT_PORT: u16 = 5432;

    /// Resolve flags/env into parameters. Every missing parameter is named
    /// in the returned error, not just the first.
    pub fn resolve(args: &ConnectionArgs) -> PgResult<Self> {
        let host = present(&args.host);
        let database = present(&args.database);
        let user = present(&args.user);
        let password = present(&args.password);

        let missing: Vec<&'static str> = [
            ("DB_HOST", host.is_none()),
            ("DB_NAME", database.is_none()),
            ("DB_USER", user.is_none()),
            ("DB_PASSWORD", password.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (host, database, user, password) {
            (Some(host), Some(database), Some(user), Some(password)) => Ok(Self {
                host,
                port: args.port.unwrap_or(Self::DEFAULT_PORT),
                database,
                user,
                password,
            }),
            _ => Err(PgError::Config { missing }),
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .application_name("docketload")
            .options([("client_min_messages", "warning")])
    }
}

/// Open the single connection used for the whole run.
pub async fn connect(params: &ConnectionParams) -> PgResult<PgConnection> {
    let conn = PgConnection::connect_with(&params.connect_options())
        .await
        .map_err(|source| PgError::Connection {
            host: params.host.clone(),
            port: params.port,
            database: params.database.clone(),
            source,
        })?;

    info!(
        host = %params.host,
        port = params.port,
        database = %params.database,
        "connected to PostgreSQL"
    );
    Ok(conn)
}

/// Close the connection. A failed close is logged, never escalated: by the
/// time we get here every load attempt has already finished.
pub async fn close(conn: PgConnection) {
    match conn.close().await {
        Ok(()) => info!("connection closed"),
        Err(err) => warn!(error = %err, "failed to close connection cleanly"),
    }
}
