//! Aggregate view for the dashboard
//!
//! One row per case with its billable-hour and task aggregates. Cases
//! without hours or tasks keep NULL hours and a zero task count.

use anyhow::{Context, Result};
use clap::Args;
use sqlx::postgres::PgConnection;
use tracing::info;

use crate::connection::{self, ConnectionArgs, ConnectionParams};
use crate::error::PgResult;

pub const INSIGHTS_VIEW: &str = "clean_case_insights";

const CREATE_VIEW_SQL: &str = r#"
CREATE OR REPLACE VIEW clean_case_insights AS
SELECT
    c.case_id,
    c.client_name,
    c.lawyer,
    c.practice_area,
    c.status,
    h.total_hours,
    COALESCE(t.task_count, 0) AS task_count,
    COALESCE(h.any_billed, FALSE) AS any_billed,
    t.earliest_due,
    t.latest_due,
    c.end_date
FROM cases c
LEFT JOIN (
    SELECT case_id,
           SUM(hours_logged) AS total_hours,
           BOOL_OR(billed = 'Yes') AS any_billed
    FROM billable_hours
    GROUP BY case_id
) h ON h.case_id = c.case_id
LEFT JOIN (
    SELECT case_id,
           COUNT(*) AS task_count,
           MIN(due_date) AS earliest_due,
           MAX(due_date) AS latest_due
    FROM tasks
    GROUP BY case_id
) t ON t.case_id = c.case_id
"#;

#[derive(Args, Debug)]
pub struct InsightsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Headline numbers shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Headline {
    pub total_cases: i64,
    pub overdue_cases: i64,
    pub total_hours: f64,
}

pub async fn create_view(conn: &mut PgConnection) -> PgResult<()> {
    sqlx::query(CREATE_VIEW_SQL).execute(&mut *conn).await?;
    info!(view = INSIGHTS_VIEW, "view ready");
    Ok(())
}

pub async fn headline(conn: &mut PgConnection) -> PgResult<Headline> {
    let row = sqlx::query_as::<_, Headline>(
        r#"
        SELECT
            COUNT(*) AS total_cases,
            COUNT(*) FILTER (WHERE status = 'Overdue') AS overdue_cases,
            COALESCE(SUM(total_hours), 0)::FLOAT8 AS total_hours
        FROM clean_case_insights
        "#,
    )
    .fetch_one(&mut *conn)
    .await?;
    Ok(row)
}

pub async fn run_insights(args: InsightsArgs) -> Result<()> {
    let params = ConnectionParams::resolve(&args.connection)
        .context("incomplete connection configuration")?;
    let mut conn = connection::connect(&params)
        .await
        .context("failed to connect to PostgreSQL")?;

    let result = async {
        create_view(&mut conn).await?;
        headline(&mut conn).await
    }
    .await;
    connection::close(conn).await;

    let headline = result.context("failed to build case insights")?;
    println!("Total cases:          {}", headline.total_cases);
    println!("Overdue cases:        {}", headline.overdue_cases);
    println!("Total billable hours: {:.2}", headline.total_hours);
    Ok(())
}
