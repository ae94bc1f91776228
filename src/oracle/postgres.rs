//! PostgreSQL oracle - External reference engine over sqlx
//!
//! Staging tables persist in the target database; every execution resets
//! and queries them inside one transaction on a single pooled connection.

use super::sql::{self, Dialect};
use super::ReferenceOracle;
use crate::error::Result;
use crate::join::{JoinKind, JoinPair, JoinResult};
use crate::table::Table;
use crate::value::Value;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

pub struct PostgresOracle {
    pool: PgPool,
}

impl PostgresOracle {
    /// Connect and create the staging tables if missing
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        for stmt in sql::create_table_statements(Dialect::Postgres) {
            sqlx::query(&stmt).execute(&pool).await?;
        }

        info!(
            "PostgreSQL oracle ready ({})",
            database_url.split('@').nth(1).unwrap_or("database")
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl ReferenceOracle for PostgresOracle {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn execute(&self, kind: JoinKind, left: &Table, right: &Table) -> Result<JoinResult> {
        let reset = sql::reset_statements(Dialect::Postgres, left, right);
        let query = sql::join_query(kind);
        debug!("postgres oracle query: {}", query);

        let mut tx = self.pool.begin().await?;
        for stmt in &reset {
            sqlx::query(stmt).execute(&mut *tx).await?;
        }
        let rows: Vec<(Option<i64>, Option<i64>)> =
            sqlx::query_as(&query).fetch_all(&mut *tx).await?;
        tx.commit().await?;

        Ok(rows
            .into_iter()
            .map(|(l, r)| JoinPair::new(Value::from(l), Value::from(r)))
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL oracle closed");
    }
}
