//! SQL text for staging tables and reference join queries

use crate::join::JoinKind;
use crate::table::Table;
use itertools::Itertools;

pub const LEFT_TABLE: &str = "jh_left";
pub const RIGHT_TABLE: &str = "jh_right";

/// SQL flavour of the reference engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    fn id_type(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "INTEGER",
            Dialect::Postgres => "BIGINT",
        }
    }

    fn clear(&self, table: &str) -> String {
        match self {
            // SQLite has no TRUNCATE
            Dialect::Sqlite => format!("DELETE FROM {};", table),
            Dialect::Postgres => format!("TRUNCATE TABLE {};", table),
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS`, one statement per staging table
pub fn create_table_statements(dialect: Dialect) -> Vec<String> {
    [LEFT_TABLE, RIGHT_TABLE]
        .iter()
        .map(|t| format!("CREATE TABLE IF NOT EXISTS {} (id {});", t, dialect.id_type()))
        .collect()
}

/// Both staging table definitions as one script
pub fn create_tables(dialect: Dialect) -> String {
    create_table_statements(dialect).join("\n")
}

/// Statements that clear `table` and insert `rows`; an empty table gets no INSERT
pub fn reset_table_statements(dialect: Dialect, table: &str, rows: &Table) -> Vec<String> {
    let mut stmts = vec![dialect.clear(table)];
    if !rows.is_empty() {
        let values = rows
            .iter()
            .map(|v| format!("({})", v.to_sql_literal()))
            .join(",");
        stmts.push(format!("INSERT INTO {} (id) VALUES {};", table, values));
    }
    stmts
}

/// Clear `table` and insert `rows` as one script
pub fn reset_table(dialect: Dialect, table: &str, rows: &Table) -> String {
    reset_table_statements(dialect, table, rows).join("\n")
}

/// Reset statements for both staging tables, left first
pub fn reset_statements(dialect: Dialect, left: &Table, right: &Table) -> Vec<String> {
    let mut stmts = reset_table_statements(dialect, LEFT_TABLE, left);
    stmts.extend(reset_table_statements(dialect, RIGHT_TABLE, right));
    stmts
}

/// Reset script for both staging tables
pub fn reset_script(dialect: Dialect, left: &Table, right: &Table) -> String {
    reset_statements(dialect, left, right).join("\n")
}

/// Join query returning `(left_id, right_id)` rows
pub fn join_query(kind: JoinKind) -> String {
    format!(
        "SELECT {l}.id AS left_id, {r}.id AS right_id FROM {l} {op} {r} ON {l}.id = {r}.id",
        l = LEFT_TABLE,
        r = RIGHT_TABLE,
        op = kind.sql_keyword()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table;

    #[test]
    fn test_reset_table_with_nulls() {
        let sql = reset_table(Dialect::Postgres, "jh_left", &table![1, null]);
        assert_eq!(
            sql,
            "TRUNCATE TABLE jh_left;\nINSERT INTO jh_left (id) VALUES (1),(NULL);"
        );
    }

    #[test]
    fn test_reset_empty_table_only_clears() {
        let sql = reset_table(Dialect::Sqlite, "jh_right", &table![]);
        assert_eq!(sql, "DELETE FROM jh_right;");
    }

    #[test]
    fn test_join_query() {
        assert_eq!(
            join_query(JoinKind::FullOuter),
            "SELECT jh_left.id AS left_id, jh_right.id AS right_id \
             FROM jh_left FULL OUTER JOIN jh_right ON jh_left.id = jh_right.id"
        );
    }

    #[test]
    fn test_reset_statements_are_split_per_table() {
        let stmts = reset_statements(Dialect::Postgres, &table![2], &table![]);
        assert_eq!(
            stmts,
            vec![
                "TRUNCATE TABLE jh_left;".to_string(),
                "INSERT INTO jh_left (id) VALUES (2);".to_string(),
                "TRUNCATE TABLE jh_right;".to_string(),
            ]
        );
        assert_eq!(reset_script(Dialect::Postgres, &table![2], &table![]), stmts.join("\n"));
    }

    #[test]
    fn test_create_tables() {
        let sql = create_tables(Dialect::Postgres);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS jh_left (id BIGINT);"));
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS jh_right (id BIGINT);"));
    }
}
