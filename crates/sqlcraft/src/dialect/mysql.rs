//! MySQL and MariaDB.

use super::{
    DateComparison, Dialect, IdentifierQuoting, JsonPathSyntax, Locking, Returning, RowLimiting,
    Upsert, VectorDistance, json_path_literal,
};
use crate::error::{SqlError, SqlResult};
use crate::query::{Lock, VectorMetric};

/// Largest LIMIT MySQL accepts; used when only an offset is given.
const MAX_ROWS: u64 = u64::MAX;

/// MySQL 8.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

/// MariaDB: MySQL syntax plus `RETURNING` on INSERT and vector search.
#[derive(Debug, Clone, Copy, Default)]
pub struct MariaDb;

macro_rules! mysql_family {
    ($($ty:ty),*) => {
        $(
            impl IdentifierQuoting for $ty {
                fn quote_chars(&self) -> (char, char) {
                    ('`', '`')
                }
            }

            impl RowLimiting for $ty {
                fn limit_offset(&self, limit: Option<u32>, offset: Option<u32>, _ordered: bool) -> String {
                    match (limit, offset) {
                        (Some(n), Some(m)) => format!(" LIMIT {n} OFFSET {m}"),
                        (Some(n), None) => format!(" LIMIT {n}"),
                        (None, Some(m)) => format!(" LIMIT {MAX_ROWS} OFFSET {m}"),
                        (None, None) => String::new(),
                    }
                }
            }

            impl Locking for $ty {
                fn lock_clause(&self, lock: &Lock) -> String {
                    match lock {
                        Lock::Exclusive => " FOR UPDATE".to_string(),
                        Lock::Shared => " LOCK IN SHARE MODE".to_string(),
                        Lock::Custom(clause) => format!(" {clause}"),
                    }
                }
            }

            impl DateComparison for $ty {
                fn date_expression(&self, column: &str) -> String {
                    format!("DATE({column})")
                }
            }

            impl JsonPathSyntax for $ty {
                fn json_get(&self, column: &str, path: &[&str]) -> String {
                    format!("JSON_UNQUOTE(JSON_EXTRACT({column}, {}))", json_path_literal(path))
                }

                fn json_set(&self, target: &str, path: &[&str], value: &str) -> String {
                    format!("JSON_SET({target}, {}, {value})", json_path_literal(path))
                }
            }

            impl Upsert for $ty {
                fn insert_keyword(&self, has_updates: bool) -> &'static str {
                    if has_updates { "INSERT INTO" } else { "INSERT IGNORE INTO" }
                }

                fn upsert_clause(&self, _conflict: &[String], assignments: &str) -> SqlResult<String> {
                    if assignments.is_empty() {
                        return Ok(String::new());
                    }
                    Ok(format!(" ON DUPLICATE KEY UPDATE {assignments}"))
                }
            }
        )*
    };
}

mysql_family!(MySql, MariaDb);

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn empty_insert(&self) -> &'static str {
        " () VALUES ()"
    }

    fn dates(&self) -> Option<&dyn DateComparison> {
        Some(self)
    }

    fn json(&self) -> Option<&dyn JsonPathSyntax> {
        Some(self)
    }

    fn upsert(&self) -> Option<&dyn Upsert> {
        Some(self)
    }
}

impl Returning for MariaDb {
    fn supports_update(&self) -> bool {
        false
    }
}

impl VectorDistance for MariaDb {
    fn distance_expression(&self, column: &str, metric: VectorMetric, _dimensions: usize) -> SqlResult<String> {
        let function = match metric {
            VectorMetric::Euclidean => "VEC_DISTANCE_EUCLIDEAN",
            VectorMetric::Cosine => "VEC_DISTANCE_COSINE",
            VectorMetric::InnerProduct => {
                return Err(SqlError::unsupported(self.name(), "inner product distance"));
            }
        };
        Ok(format!("{function}({column}, VEC_FromText(?))"))
    }
}

impl Dialect for MariaDb {
    fn name(&self) -> &'static str {
        "MariaDB"
    }

    fn empty_insert(&self) -> &'static str {
        " () VALUES ()"
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

    fn vectors(&self) -> Option<&dyn VectorDistance> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtick_quoting() {
        assert_eq!(MySql.escape_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn offset_without_limit() {
        assert_eq!(
            MySql.limit_offset(None, Some(5), false),
            " LIMIT 18446744073709551615 OFFSET 5"
        );
    }

    #[test]
    fn json_extract() {
        assert_eq!(
            MySql.json_get("`data`", &["address", "city"]),
            r#"JSON_UNQUOTE(JSON_EXTRACT(`data`, '$."address"."city"'))"#
        );
    }

    #[test]
    fn insert_ignore_without_updates() {
        assert_eq!(MySql.insert_keyword(false), "INSERT IGNORE INTO");
        assert_eq!(MySql.upsert_clause(&[], "").unwrap(), "");
    }

    #[test]
    fn mariadb_capabilities() {
        assert!(MySql.returning().is_none());
        assert!(MariaDb.returning().is_some());
        let err = MariaDb
            .distance_expression("`v`", VectorMetric::InnerProduct, 3)
            .unwrap_err();
        assert!(err.is_unsupported());
    }
}
