//! Oracle Database.

use super::{
    DateComparison, Dialect, IdentifierQuoting, JsonPathSyntax, Locking, RowLimiting,
    VectorDistance, json_path_literal,
};
use crate::error::SqlResult;
use crate::query::{Lock, VectorMetric};

/// Oracle 12c+ (`OFFSET .. FETCH`), 23ai for vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl IdentifierQuoting for Oracle {}

impl RowLimiting for Oracle {
    fn limit_offset(&self, limit: Option<u32>, offset: Option<u32>, _ordered: bool) -> String {
        let mut sql = String::new();
        if let Some(m) = offset {
            sql.push_str(&format!(" OFFSET {m} ROWS"));
        }
        if let Some(n) = limit {
            sql.push_str(&format!(" FETCH NEXT {n} ROWS ONLY"));
        }
        sql
    }
}

impl Locking for Oracle {
    fn lock_clause(&self, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive => " FOR UPDATE".to_string(),
            Lock::Shared => String::new(),
            Lock::Custom(clause) => format!(" {clause}"),
        }
    }
}

impl DateComparison for Oracle {
    fn date_expression(&self, column: &str) -> String {
        format!("TO_CHAR({column}, 'YYYY-MM-DD')")
    }

    fn expands_day_bounds(&self) -> bool {
        false
    }
}

impl JsonPathSyntax for Oracle {
    fn json_get(&self, column: &str, path: &[&str]) -> String {
        format!("JSON_VALUE({column}, {})", json_path_literal(path))
    }

    fn json_set(&self, target: &str, path: &[&str], value: &str) -> String {
        format!("JSON_TRANSFORM({target}, SET {} = {value})", json_path_literal(path))
    }
}

impl VectorDistance for Oracle {
    fn distance_expression(&self, column: &str, metric: VectorMetric, _dimensions: usize) -> SqlResult<String> {
        let metric = match metric {
            VectorMetric::Euclidean => "EUCLIDEAN",
            VectorMetric::Cosine => "COSINE",
            VectorMetric::InnerProduct => "DOT",
        };
        Ok(format!("VECTOR_DISTANCE({column}, TO_VECTOR(?), {metric})"))
    }
}

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "Oracle"
    }

    fn dummy_table(&self) -> Option<&'static str> {
        Some("DUAL")
    }

    fn multi_row_insert_union(&self) -> bool {
        true
    }

    fn table_alias_separator(&self) -> &'static str {
        " "
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

    fn vectors(&self) -> Option<&dyn VectorDistance> {
        Some(self)
    }
}
