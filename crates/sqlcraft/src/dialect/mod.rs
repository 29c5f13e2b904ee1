//! SQL dialects.
//!
//! A dialect is a zero-sized descriptor composed from one small trait per
//! point where engines disagree. The three mandatory traits
//! ([`IdentifierQuoting`], [`RowLimiting`], [`Locking`]) have ANSI defaults.
//! Optional capabilities are exposed through [`Dialect`] accessors returning
//! `Option<&dyn ..>`; `None` means the engine has no such feature and the
//! compiler reports [`SqlError::Unsupported`](crate::SqlError::Unsupported).
//!
//! | Dialect | Quote | Rows | Dates | JSON | RETURNING | Upsert | Vectors |
//! |---|---|---|---|---|---|---|---|
//! | [`Ansi`] | `"` | `LIMIT/OFFSET` | | | | | |
//! | [`MySql`] | `` ` `` | `LIMIT/OFFSET` | yes | yes | | yes | |
//! | [`MariaDb`] | `` ` `` | `LIMIT/OFFSET` | yes | yes | yes | yes | yes |
//! | [`Postgres`] | `"` | `LIMIT/OFFSET` | yes | yes | yes | yes | yes |
//! | [`Sqlite`] | `"` | `LIMIT/OFFSET` | yes | yes | yes | yes | |
//! | [`SqlServer`] | `[]` | `OFFSET/FETCH` | yes | yes | `OUTPUT` | | yes |
//! | [`Oracle`] | `"` | `OFFSET/FETCH` | yes | yes | | | yes |
//! | [`Firebird`] | `"` | `ROWS m TO n` | yes | | yes | | |
//! | [`Db2`] | `"` | `ROW_NUMBER()` | yes | | | | |
//! | [`NuoDb`] | `` ` `` | `LIMIT/OFFSET` | yes | | | | |

mod ansi;
mod db2;
mod firebird;
mod mysql;
mod nuodb;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use ansi::Ansi;
pub use db2::Db2;
pub use firebird::Firebird;
pub use mysql::{MariaDb, MySql};
pub use nuodb::NuoDb;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use sqlserver::SqlServer;

use crate::compiler::count_placeholders_quoted;
use crate::error::SqlResult;
use crate::ident::is_array_index;
use crate::query::{Lock, VectorMetric};
use crate::value::Value;
use std::fmt;

/// Identifier quote characters.
pub trait IdentifierQuoting {
    /// Opening and closing quote characters.
    fn quote_chars(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quote one identifier segment, doubling any closing quote inside it.
    fn escape_identifier(&self, ident: &str) -> String {
        let (open, close) = self.quote_chars();
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(open);
        for c in ident.chars() {
            if c == close {
                out.push(close);
            }
            out.push(c);
        }
        out.push(close);
        out
    }

    /// Count `?` placeholders in `sql`, skipping literals and this
    /// dialect's quoted identifiers.
    fn count_placeholders(&self, sql: &str) -> usize {
        count_placeholders_quoted(sql, self.quote_chars())
    }
}

/// Row limiting. Limits and offsets are rendered as integer literals.
pub trait RowLimiting {
    /// Suffix placed after ORDER BY. `ordered` is true when ORDER BY was emitted.
    fn limit_offset(&self, limit: Option<u32>, offset: Option<u32>, ordered: bool) -> String {
        let _ = ordered;
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        if let Some(m) = offset {
            sql.push_str(&format!(" OFFSET {m}"));
        }
        sql
    }

    /// Apply row limiting to a complete `SELECT ... [ORDER BY ...]`.
    ///
    /// Dialects that emulate limits by wrapping the statement override this.
    fn limit_select(&self, select: String, ordered: bool, limit: Option<u32>, offset: Option<u32>) -> String {
        if limit.is_none() && offset.is_none() {
            return select;
        }
        let suffix = self.limit_offset(limit, offset, ordered);
        select + &suffix
    }
}

/// Row locks.
pub trait Locking {
    /// Clause appended to the end of a SELECT. ANSI has no portable lock
    /// syntax, so only custom locks render by default.
    fn lock_clause(&self, lock: &Lock) -> String {
        match lock {
            Lock::Custom(clause) => format!(" {clause}"),
            Lock::Exclusive | Lock::Shared => String::new(),
        }
    }

    /// Table hint placed right after the FROM table.
    fn table_hint(&self, lock: &Lock) -> String {
        let _ = lock;
        String::new()
    }
}

/// Calendar-date comparisons (`where_date`, `between_date`).
pub trait DateComparison {
    /// Expression reducing an escaped column to its calendar date.
    fn date_expression(&self, column: &str) -> String;

    /// Whether `between_date` expands to a full-day `BETWEEN` on the raw
    /// column instead of comparing date expressions.
    fn expands_day_bounds(&self) -> bool {
        true
    }
}

/// JSON path access below a column.
pub trait JsonPathSyntax {
    /// Read `path` from an escaped column.
    fn json_get(&self, column: &str, path: &[&str]) -> String;

    /// Expression that sets `path` inside `target` to the rendered `value`.
    fn json_set(&self, target: &str, path: &[&str], value: &str) -> String;

    /// Adjust a value bound into a JSON path assignment.
    fn json_value(&self, value: Value) -> Value {
        value
    }
}

/// RETURNING (or equivalent) on INSERT and UPDATE.
pub trait Returning {
    /// Render the clause for already escaped columns.
    fn returning_clause(&self, columns: &[String]) -> String {
        format!(" RETURNING {}", columns.join(", "))
    }

    /// True when the clause sits inside the statement (before VALUES or
    /// WHERE) rather than at its end.
    fn is_inline(&self) -> bool {
        false
    }

    /// Whether UPDATE accepts the clause too.
    fn supports_update(&self) -> bool {
        true
    }
}

/// Insert-or-update.
pub trait Upsert {
    /// Keyword opening the INSERT. `has_updates` is false when the conflict
    /// should be ignored.
    fn insert_keyword(&self, has_updates: bool) -> &'static str {
        let _ = has_updates;
        "INSERT INTO"
    }

    /// Conflict clause appended after VALUES. `conflict` holds escaped target
    /// columns, `assignments` the rendered `col = value` list (may be empty).
    fn upsert_clause(&self, conflict: &[String], assignments: &str) -> SqlResult<String>;
}

/// Vector similarity search.
pub trait VectorDistance {
    /// Distance expression between an escaped column and one placeholder.
    fn distance_expression(&self, column: &str, metric: VectorMetric, dimensions: usize) -> SqlResult<String>;

    /// The value bound for the query vector.
    fn vector_value(&self, vector: &[f32]) -> Value {
        Value::Text(Value::vector_text(vector))
    }
}

/// A target database engine.
pub trait Dialect: IdentifierQuoting + RowLimiting + Locking + Send + Sync + fmt::Debug {
    /// Display name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Table used when a query has no FROM (`DUAL`), or `None` to omit FROM.
    fn dummy_table(&self) -> Option<&'static str> {
        None
    }

    /// Tail of an INSERT without columns.
    fn empty_insert(&self) -> &'static str {
        " DEFAULT VALUES"
    }

    /// Whether multi-row inserts are written as `SELECT .. UNION ALL SELECT ..`.
    fn multi_row_insert_union(&self) -> bool {
        false
    }

    /// Text between a table (or derived table) and its alias.
    fn table_alias_separator(&self) -> &'static str {
        " AS "
    }

    /// Keyword after `WITH` for recursive CTEs.
    fn recursive_keyword(&self) -> &'static str {
        "RECURSIVE "
    }

    fn dates(&self) -> Option<&dyn DateComparison> {
        None
    }

    fn json(&self) -> Option<&dyn JsonPathSyntax> {
        None
    }

    fn returning(&self) -> Option<&dyn Returning> {
        None
    }

    fn upsert(&self) -> Option<&dyn Upsert> {
        None
    }

    fn vectors(&self) -> Option<&dyn VectorDistance> {
        None
    }
}

static ANSI: Ansi = Ansi;
static MYSQL: MySql = MySql;
static MARIADB: MariaDb = MariaDb;
static POSTGRES: Postgres = Postgres;
static SQLITE: Sqlite = Sqlite;
static SQLSERVER: SqlServer = SqlServer;
static ORACLE: Oracle = Oracle;
static FIREBIRD: Firebird = Firebird;
static DB2: Db2 = Db2 { legacy: false };
static NUODB: NuoDb = NuoDb;

/// Look up a dialect by name (case-insensitive).
///
/// Accepts the usual aliases: `postgresql`/`pgsql`, `mssql`/`sqlsrv`.
pub fn by_name(name: &str) -> Option<&'static dyn Dialect> {
    let dialect: &'static dyn Dialect = match name.trim().to_ascii_lowercase().as_str() {
        "ansi" | "sql" => &ANSI,
        "mysql" => &MYSQL,
        "mariadb" => &MARIADB,
        "postgres" | "postgresql" | "pgsql" => &POSTGRES,
        "sqlite" | "sqlite3" => &SQLITE,
        "sqlserver" | "mssql" | "sqlsrv" => &SQLSERVER,
        "oracle" => &ORACLE,
        "firebird" => &FIREBIRD,
        "db2" => &DB2,
        "nuodb" => &NUODB,
        _ => return None,
    };
    Some(dialect)
}

/// Every built-in dialect, in a stable order.
pub fn all() -> [&'static dyn Dialect; 10] {
    [
        &ANSI, &MYSQL, &MARIADB, &POSTGRES, &SQLITE, &SQLSERVER, &ORACLE, &FIREBIRD, &DB2, &NUODB,
    ]
}

/// String literal with `'` doubled.
pub(crate) fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `$."a"[0]."b"` path expression as a SQL string literal.
pub(crate) fn json_path_literal(path: &[&str]) -> String {
    let mut out = String::from("$");
    for segment in path {
        if is_array_index(segment) {
            out.push('[');
            out.push_str(segment);
            out.push(']');
        } else {
            out.push_str(".\"");
            out.push_str(&segment.replace('\\', "\\\\").replace('"', "\\\""));
            out.push('"');
        }
    }
    quote_literal(&out)
}
