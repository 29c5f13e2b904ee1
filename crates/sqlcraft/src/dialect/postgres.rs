//! PostgreSQL.

use super::{
    DateComparison, Dialect, IdentifierQuoting, JsonPathSyntax, Locking, Returning, RowLimiting,
    Upsert, VectorDistance, quote_literal,
};
use crate::error::{SqlError, SqlResult};
use crate::ident::is_array_index;
use crate::query::{Lock, VectorMetric};
use crate::value::Value;

/// PostgreSQL, with pgvector operators for vector search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl IdentifierQuoting for Postgres {}

impl RowLimiting for Postgres {}

impl Locking for Postgres {
    fn lock_clause(&self, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive => " FOR UPDATE".to_string(),
            Lock::Shared => " FOR SHARE".to_string(),
            Lock::Custom(clause) => format!(" {clause}"),
        }
    }
}

impl DateComparison for Postgres {
    fn date_expression(&self, column: &str) -> String {
        format!("CAST({column} AS DATE)")
    }
}

impl JsonPathSyntax for Postgres {
    fn json_get(&self, column: &str, path: &[&str]) -> String {
        let mut sql = column.to_string();
        let last = path.len().saturating_sub(1);
        for (i, segment) in path.iter().enumerate() {
            sql.push_str(if i == last { "->>" } else { "->" });
            if is_array_index(segment) {
                sql.push_str(segment);
            } else {
                sql.push_str(&quote_literal(segment));
            }
        }
        sql
    }

    fn json_set(&self, target: &str, path: &[&str], value: &str) -> String {
        let keys = path
            .iter()
            .map(|s| format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "jsonb_set({target}::jsonb, {}, CAST({value} AS jsonb))",
            quote_literal(&format!("{{{keys}}}"))
        )
    }

    fn json_value(&self, value: Value) -> Value {
        match value {
            Value::Json(_) => value,
            // `jsonb_set` is strict; SQL NULL would null the whole document.
            Value::Null => Value::Json(serde_json::Value::Null),
            other => match serde_json::to_value(&other) {
                // The tagged form is {"type": .., "value": ..}; keep the payload.
                Ok(serde_json::Value::Object(mut map)) => {
                    Value::Json(map.remove("value").unwrap_or(serde_json::Value::Null))
                }
                _ => other,
            },
        }
    }
}

impl Returning for Postgres {}

impl Upsert for Postgres {
    fn upsert_clause(&self, conflict: &[String], assignments: &str) -> SqlResult<String> {
        on_conflict(self.name(), conflict, assignments)
    }
}

/// `ON CONFLICT` clause shared with SQLite.
pub(super) fn on_conflict(dialect: &'static str, conflict: &[String], assignments: &str) -> SqlResult<String> {
    let target = if conflict.is_empty() {
        String::new()
    } else {
        format!(" ({})", conflict.join(", "))
    };
    if assignments.is_empty() {
        return Ok(format!(" ON CONFLICT{target} DO NOTHING"));
    }
    if conflict.is_empty() {
        return Err(SqlError::malformed(format!(
            "{dialect} upsert with updates requires conflict target columns"
        )));
    }
    Ok(format!(" ON CONFLICT{target} DO UPDATE SET {assignments}"))
}

impl VectorDistance for Postgres {
    fn distance_expression(&self, column: &str, metric: VectorMetric, _dimensions: usize) -> SqlResult<String> {
        let op = match metric {
            VectorMetric::Euclidean => "<->",
            VectorMetric::Cosine => "<=>",
            VectorMetric::InnerProduct => "<#>",
        };
        Ok(format!("({column} {op} ?::text::vector)"))
    }
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "PostgreSQL"
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
    fn arrow_chain() {
        assert_eq!(
            Postgres.json_get("\"data\"", &["items", "0", "name"]),
            "\"data\"->'items'->0->>'name'"
        );
        assert_eq!(Postgres.json_get("\"data\"", &["it's"]), "\"data\"->>'it''s'");
    }

    #[test]
    fn jsonb_set() {
        assert_eq!(
            Postgres.json_set("\"data\"", &["a", "b"], "?"),
            r#"jsonb_set("data"::jsonb, '{"a","b"}', CAST(? AS jsonb))"#
        );
    }

    #[test]
    fn json_values_are_wrapped() {
        assert_eq!(
            Postgres.json_value(Value::Text("x".into())),
            Value::Json(serde_json::json!("x"))
        );
        assert_eq!(Postgres.json_value(Value::Int(3)), Value::Json(serde_json::json!(3)));
        assert_eq!(Postgres.json_value(Value::Null), Value::Json(serde_json::Value::Null));
    }

    #[test]
    fn on_conflict_variants() {
        let target = vec!["\"id\"".to_string()];
        assert_eq!(
            Postgres.upsert_clause(&target, "\"n\" = ?").unwrap(),
            " ON CONFLICT (\"id\") DO UPDATE SET \"n\" = ?"
        );
        assert_eq!(
            Postgres.upsert_clause(&target, "").unwrap(),
            " ON CONFLICT (\"id\") DO NOTHING"
        );
        assert!(Postgres.upsert_clause(&[], "\"n\" = ?").unwrap_err().is_malformed());
    }

    #[test]
    fn pgvector_operators() {
        assert_eq!(
            Postgres
                .distance_expression("\"embedding\"", VectorMetric::Cosine, 3)
                .unwrap(),
            "(\"embedding\" <=> ?::text::vector)"
        );
    }
}
