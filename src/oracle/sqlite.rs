//! SQLite oracle - In-memory embedded reference engine (default)

use super::sql::{self, Dialect};
use super::ReferenceOracle;
use crate::error::{HarnessError, Result};
use crate::join::{JoinKind, JoinResult};
use crate::table::Table;
use crate::value::Value;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

pub struct SqliteOracle {
    db: Mutex<Connection>,
}

impl SqliteOracle {
    /// Open a private in-memory database with both staging tables
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&sql::create_tables(Dialect::Sqlite))?;
        info!("SQLite oracle ready (sqlite {})", rusqlite::version());
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|e| HarnessError::Oracle(format!("sqlite connection poisoned: {}", e)))
    }

    fn ping(&self) -> Result<bool> {
        let conn = self.lock()?;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    fn run(&self, kind: JoinKind, left: &Table, right: &Table) -> Result<JoinResult> {
        let conn = self.lock()?;
        conn.execute_batch(&sql::reset_script(Dialect::Sqlite, left, right))?;

        let query = sql::join_query(kind);
        debug!("sqlite oracle query: {}", query);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            let l: Option<i64> = row.get(0)?;
            let r: Option<i64> = row.get(1)?;
            Ok((Value::from(l), Value::from(r)))
        })?;

        let mut res = JoinResult::new();
        for row in rows {
            let (l, r) = row?;
            res.push(l, r);
        }
        Ok(res)
    }
}

#[async_trait]
impl ReferenceOracle for SqliteOracle {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn execute(&self, kind: JoinKind, left: &Table, right: &Table) -> Result<JoinResult> {
        self.run(kind, left, right)
    }

    async fn health_check(&self) -> Result<bool> {
        self.ping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::pairs;
    use crate::multiset::multiset_eq;
    use crate::table;

    #[tokio::test]
    async fn test_sqlite_scenario() {
        let oracle = SqliteOracle::open_in_memory().unwrap();
        let left = table![1, 1, 2];
        let right = table![1, null];

        let inner = oracle.execute(JoinKind::Inner, &left, &right).await.unwrap();
        assert!(multiset_eq(&inner, &pairs(&[(Some(1), Some(1)), (Some(1), Some(1))])));

        let full = oracle.execute(JoinKind::FullOuter, &left, &right).await.unwrap();
        let expected = pairs(&[
            (Some(1), Some(1)),
            (Some(1), Some(1)),
            (Some(2), None),
            (None, None),
        ]);
        assert!(multiset_eq(&full, &expected), "{}", full);
    }

    #[tokio::test]
    async fn test_sqlite_tables_are_reset_between_calls() {
        let oracle = SqliteOracle::open_in_memory().unwrap();
        oracle
            .execute(JoinKind::Inner, &table![1, 2], &table![1, 2])
            .await
            .unwrap();
        let res = oracle
            .execute(JoinKind::LeftOuter, &table![], &table![1])
            .await
            .unwrap();
        assert!(res.is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_health_check() {
        let oracle = SqliteOracle::open_in_memory().unwrap();
        assert!(oracle.health_check().await.unwrap());
    }
}
