//! Reference Oracle - Trusted relational engines for differential checks
//!
//! An oracle seeds two staging tables with the trial's rows and runs the
//! equivalent SQL join. SQL `=` already gives "null never matches", so the
//! engine's answer is directly comparable to the in-memory joins.

pub mod postgres;
pub mod sql;
pub mod sqlite;

use crate::config::{HarnessConfig, OracleBackend};
use crate::error::{HarnessError, Result};
use crate::join::{JoinKind, JoinResult};
use crate::table::Table;
use async_trait::async_trait;

pub use postgres::PostgresOracle;
pub use sqlite::SqliteOracle;

/// Reference engine contract consumed by the driver
#[async_trait]
pub trait ReferenceOracle: Send + Sync {
    /// Oracle name (e.g., "sqlite", "postgres")
    fn name(&self) -> &'static str;

    /// Compute `kind` over `left` and `right` in the reference engine.
    /// Any engine failure is a [`HarnessError::Oracle`].
    async fn execute(&self, kind: JoinKind, left: &Table, right: &Table) -> Result<JoinResult>;

    /// Check the engine is reachable and answers queries
    async fn health_check(&self) -> Result<bool>;

    /// Release engine connections; the embedded engine has nothing to release
    async fn close(&self) {}
}

/// Open the oracle selected by `config`
pub async fn connect(config: &HarnessConfig) -> Result<Box<dyn ReferenceOracle>> {
    match config.oracle {
        OracleBackend::Sqlite => Ok(Box::new(SqliteOracle::open_in_memory()?)),
        OracleBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                HarnessError::Config(
                    "postgres oracle needs --database-url or DATABASE_URL".to_string(),
                )
            })?;
            Ok(Box::new(PostgresOracle::connect(url).await?))
        }
    }
}
