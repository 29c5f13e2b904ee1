//! Microsoft SQL Server.

use super::{
    DateComparison, Dialect, IdentifierQuoting, JsonPathSyntax, Locking, Returning, RowLimiting,
    VectorDistance, json_path_literal,
};
use crate::error::SqlResult;
use crate::query::{Lock, VectorMetric};

/// SQL Server 2012+ (`OFFSET .. FETCH`), 2025 for `VECTOR_DISTANCE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl IdentifierQuoting for SqlServer {
    fn quote_chars(&self) -> (char, char) {
        ('[', ']')
    }
}

impl RowLimiting for SqlServer {
    fn limit_offset(&self, limit: Option<u32>, offset: Option<u32>, ordered: bool) -> String {
        if limit.is_none() && offset.is_none() {
            return String::new();
        }
        // OFFSET .. FETCH is only valid after ORDER BY.
        let mut sql = String::new();
        if !ordered {
            sql.push_str(" ORDER BY (SELECT 0)");
        }
        sql.push_str(&format!(" OFFSET {} ROWS", offset.unwrap_or(0)));
        if let Some(n) = limit {
            sql.push_str(&format!(" FETCH NEXT {n} ROWS ONLY"));
        }
        sql
    }

    /// `FETCH NEXT 0` is rejected, so an empty page filters the paged
    /// statement out entirely.
    fn limit_select(&self, select: String, ordered: bool, limit: Option<u32>, offset: Option<u32>) -> String {
        if limit != Some(0) {
            return select + &self.limit_offset(limit, offset, ordered);
        }
        let paged = select + &self.limit_offset(None, Some(offset.unwrap_or(0)), ordered);
        let alias = self.escape_identifier("empty_page");
        format!("SELECT * FROM ({paged}) AS {alias} WHERE 1 = 0")
    }
}

/// Locks are table hints; nothing trails the statement.
impl Locking for SqlServer {
    fn lock_clause(&self, _lock: &Lock) -> String {
        String::new()
    }

    fn table_hint(&self, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive => " WITH (UPDLOCK, ROWLOCK)".to_string(),
            Lock::Shared => " WITH (HOLDLOCK, ROWLOCK)".to_string(),
            Lock::Custom(hint) => format!(" {hint}"),
        }
    }
}

impl DateComparison for SqlServer {
    fn date_expression(&self, column: &str) -> String {
        format!("CAST({column} AS DATE)")
    }
}

impl JsonPathSyntax for SqlServer {
    fn json_get(&self, column: &str, path: &[&str]) -> String {
        format!("JSON_VALUE({column}, {})", json_path_literal(path))
    }

    fn json_set(&self, target: &str, path: &[&str], value: &str) -> String {
        format!("JSON_MODIFY({target}, {}, {value})", json_path_literal(path))
    }
}

/// `OUTPUT INSERTED.col` sits before VALUES / WHERE.
impl Returning for SqlServer {
    fn returning_clause(&self, columns: &[String]) -> String {
        let columns = columns
            .iter()
            .map(|c| format!("INSERTED.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(" OUTPUT {columns}")
    }

    fn is_inline(&self) -> bool {
        true
    }
}

impl VectorDistance for SqlServer {
    fn distance_expression(&self, column: &str, metric: VectorMetric, dimensions: usize) -> SqlResult<String> {
        let metric = match metric {
            VectorMetric::Euclidean => "euclidean",
            VectorMetric::Cosine => "cosine",
            VectorMetric::InnerProduct => "dot",
        };
        Ok(format!(
            "VECTOR_DISTANCE('{metric}', {column}, CAST(? AS VECTOR({dimensions})))"
        ))
    }
}

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "SQL Server"
    }

    fn recursive_keyword(&self) -> &'static str {
        ""
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

    fn vectors(&self) -> Option<&dyn VectorDistance> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_quoting() {
        assert_eq!(SqlServer.escape_identifier("a]b"), "[a]]b]");
    }

    #[test]
    fn fetch_requires_order() {
        assert_eq!(
            SqlServer.limit_offset(Some(10), Some(20), false),
            " ORDER BY (SELECT 0) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(
            SqlServer.limit_offset(Some(10), None, true),
            " OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn zero_limit_is_an_empty_page() {
        assert_eq!(
            SqlServer.limit_select("SELECT * FROM [t]".into(), false, Some(0), None),
            "SELECT * FROM (SELECT * FROM [t] ORDER BY (SELECT 0) OFFSET 0 ROWS) AS [empty_page] WHERE 1 = 0"
        );
        assert_eq!(
            SqlServer.limit_select("SELECT * FROM [t] ORDER BY [id] ASC".into(), true, Some(0), Some(5)),
            "SELECT * FROM (SELECT * FROM [t] ORDER BY [id] ASC OFFSET 5 ROWS) AS [empty_page] WHERE 1 = 0"
        );
    }

    #[test]
    fn locks_are_table_hints() {
        assert_eq!(SqlServer.lock_clause(&Lock::Exclusive), "");
        assert_eq!(SqlServer.table_hint(&Lock::Exclusive), " WITH (UPDLOCK, ROWLOCK)");
    }

    #[test]
    fn output_inserted() {
        assert_eq!(
            SqlServer.returning_clause(&["[id]".to_string(), "[name]".to_string()]),
            " OUTPUT INSERTED.[id], INSERTED.[name]"
        );
    }
}
