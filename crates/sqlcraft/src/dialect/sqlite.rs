//! SQLite.

use super::postgres::on_conflict;
use super::{
    DateComparison, Dialect, IdentifierQuoting, JsonPathSyntax, Locking, Returning, RowLimiting,
    Upsert, json_path_literal,
};
use crate::error::SqlResult;
use crate::query::Lock;

/// SQLite 3.35+ (for RETURNING).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl IdentifierQuoting for Sqlite {}

impl RowLimiting for Sqlite {
    fn limit_offset(&self, limit: Option<u32>, offset: Option<u32>, _ordered: bool) -> String {
        match (limit, offset) {
            (Some(n), Some(m)) => format!(" LIMIT {n} OFFSET {m}"),
            (Some(n), None) => format!(" LIMIT {n}"),
            (None, Some(m)) => format!(" LIMIT -1 OFFSET {m}"),
            (None, None) => String::new(),
        }
    }
}

/// SQLite locks whole databases; row locks render nothing.
impl Locking for Sqlite {
    fn lock_clause(&self, lock: &Lock) -> String {
        match lock {
            Lock::Custom(clause) => format!(" {clause}"),
            Lock::Exclusive | Lock::Shared => String::new(),
        }
    }
}

impl DateComparison for Sqlite {
    fn date_expression(&self, column: &str) -> String {
        format!("strftime('%Y-%m-%d', {column})")
    }
}

impl JsonPathSyntax for Sqlite {
    fn json_get(&self, column: &str, path: &[&str]) -> String {
        format!("json_extract({column}, {})", json_path_literal(path))
    }

    fn json_set(&self, target: &str, path: &[&str], value: &str) -> String {
        format!("json_set({target}, {}, {value})", json_path_literal(path))
    }
}

impl Returning for Sqlite {}

impl Upsert for Sqlite {
    fn upsert_clause(&self, conflict: &[String], assignments: &str) -> SqlResult<String> {
        on_conflict(self.name(), conflict, assignments)
    }
}

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn dates(&self) -> Option<&dyn DateComparison> {
        Some(self)
    }

    fn json(&self) -> Option<&dyn JsonPathSyntax> {
        Some(self)
    }

    fn returning(&self) -> Option<&dyn Returning> {
        Some(self)
    }

    fn upsert(&self) -> Option<&dyn Upsert> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_only_uses_negative_limit() {
        assert_eq!(Sqlite.limit_offset(None, Some(3), true), " LIMIT -1 OFFSET 3");
    }

    #[test]
    fn no_row_locks() {
        assert_eq!(Sqlite.lock_clause(&Lock::Exclusive), "");
    }

    #[test]
    fn strftime_dates() {
        assert_eq!(Sqlite.date_expression("\"created_at\""), "strftime('%Y-%m-%d', \"created_at\")");
    }
}
