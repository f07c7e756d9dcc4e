//! Schema initializer
//!
//! `CREATE TABLE IF NOT EXISTS` for every contract, committed as one unit
//! before any row is loaded. Safe to run against an initialized store.

use docketload_core::TableKind;
use sqlx::postgres::PgConnection;
use sqlx::Acquire;
use tracing::{debug, info};

use crate::error::{PgError, PgResult};

pub async fn init_schema(conn: &mut PgConnection) -> PgResult<()> {
    let mut tx = conn.begin().await?;

    for kind in TableKind::LOAD_ORDER {
        let spec = kind.spec();
        sqlx::query(&spec.create_table_sql())
            .execute(&mut *tx)
            .await
            .map_err(|source| PgError::Schema {
                table: spec.name,
                source,
            })?;
        debug!(table = spec.name, "ensured table");
    }

    tx.commit().await?;
    info!("tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    async fn table_names(pool: &PgPool) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar(
            "select table_name::text from information_schema.tables \
             where table_schema = current_schema() order by table_name",
        )
        .fetch_all(pool)
        .await
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires database"]
    async fn creates_all_tables(pool: PgPool) -> anyhow::Result<()> {
        let mut conn = pool.acquire().await?;
        init_schema(&mut conn).await?;

        assert_eq!(
            table_names(&pool).await?,
            vec!["billable_hours", "cases", "tasks"]
        );
        Ok(())
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires database"]
    async fn schema_init_is_idempotent(pool: PgPool) -> anyhow::Result<()> {
        let mut conn = pool.acquire().await?;
        init_schema(&mut conn).await?;
        sqlx::query("insert into cases (case_id, client_name) values (1000, 'Acme LLC')")
            .execute(&pool)
            .await?;

        init_schema(&mut conn).await?;

        let count: i64 = sqlx::query_scalar("select count(*) from cases")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 1);
        assert_eq!(table_names(&pool).await?.len(), 3);
        Ok(())
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires database"]
    async fn identity_is_the_only_key(pool: PgPool) -> anyhow::Result<()> {
        let mut conn = pool.acquire().await?;
        init_schema(&mut conn).await?;

        let constraints: Vec<String> = sqlx::query_scalar(
            "select constraint_type::text from information_schema.table_constraints \
             where table_schema = current_schema() and constraint_type <> 'CHECK' \
             order by table_name",
        )
        .fetch_all(&pool)
        .await?;
        assert_eq!(constraints, vec!["PRIMARY KEY"; 3]);
        Ok(())
    }
}
