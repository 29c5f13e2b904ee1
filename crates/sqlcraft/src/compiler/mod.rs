//! Lowering of a [`Query`] to SQL text and a parameter stream.
//!
//! A [`Compiler`] pairs a [`Dialect`] with a [`CompilerConfig`]. Every compile
//! call walks the query with a fresh [`ParamList`], so one compiler can be
//! shared by many threads.
//!
//! ```ignore
//! use sqlcraft::prelude::*;
//!
//! let compiler = Compiler::new(&Postgres);
//! let compiled = compiler.select(&Query::table("users").gt("age", 18))?;
//! assert_eq!(compiled.sql, r#"SELECT * FROM "users" WHERE "age" > ?"#);
//! ```

mod condition;
mod params;
mod select;
mod write;

pub use params::{ParamList, count_placeholders, count_placeholders_quoted, number_placeholders};

use crate::config::CompilerConfig;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::query::{Query, Raw, Record, Subquery, TableRef};
use crate::value::Value;
use std::fmt;

/// Kind of compiled statement, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Upsert,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Upsert => "upsert",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text with `?` placeholders and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Compiled {
    /// The SQL with `?` rewritten to `$1, $2, ...` (PostgreSQL wire style).
    pub fn to_numbered_sql(&self) -> String {
        number_placeholders(&self.sql)
    }

    /// Parameters as references for `tokio_postgres::Client::query`.
    #[cfg(feature = "postgres")]
    pub fn params_ref(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.params
            .iter()
            .map(|v| v as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

/// Dialect-specific SQL generator.
#[derive(Debug, Clone)]
pub struct Compiler<'d> {
    dialect: &'d dyn Dialect,
    config: CompilerConfig,
}

impl<'d> Compiler<'d> {
    /// Create a compiler with the default config.
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self::with_config(dialect, CompilerConfig::default())
    }

    pub fn with_config(dialect: &'d dyn Dialect, config: CompilerConfig) -> Self {
        Self { dialect, config }
    }

    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    // ==================== Statements ====================

    /// Compile a SELECT.
    pub fn select(&self, query: &Query) -> SqlResult<Compiled> {
        let mut params = ParamList::new();
        let sql = self.compile_select(query, &mut params)?;
        Ok(self.finish(StatementKind::Select, sql, params))
    }

    /// Compile a single-row INSERT. An empty record inserts a row of defaults.
    pub fn insert(&self, query: &Query, values: &Record) -> SqlResult<Compiled> {
        self.insert_rows(query, std::slice::from_ref(values), &[])
    }

    /// Compile a multi-row INSERT. Rows are aligned to the first row's
    /// column order and must share its column set.
    pub fn insert_multiple(&self, query: &Query, rows: &[Record]) -> SqlResult<Compiled> {
        self.insert_rows(query, rows, &[])
    }

    /// INSERT returning the given columns.
    pub fn insert_and_return(&self, query: &Query, values: &Record, returning: &[&str]) -> SqlResult<Compiled> {
        self.insert_rows(query, std::slice::from_ref(values), returning)
    }

    /// Multi-row INSERT returning the given columns.
    pub fn insert_multiple_and_return(
        &self,
        query: &Query,
        rows: &[Record],
        returning: &[&str],
    ) -> SqlResult<Compiled> {
        self.insert_rows(query, rows, returning)
    }

    fn insert_rows(&self, query: &Query, rows: &[Record], returning: &[&str]) -> SqlResult<Compiled> {
        let mut params = ParamList::new();
        let sql = self.compile_insert(query, rows, returning, "INSERT INTO", &mut params)?;
        Ok(self.finish(StatementKind::Insert, sql, params))
    }

    /// Compile an UPDATE of the rows matched by the query's WHERE clause.
    pub fn update(&self, query: &Query, values: &Record) -> SqlResult<Compiled> {
        let mut params = ParamList::new();
        let sql = self.compile_update(query, values, &[], &mut params)?;
        Ok(self.finish(StatementKind::Update, sql, params))
    }

    /// UPDATE returning the given columns.
    pub fn update_and_return(&self, query: &Query, values: &Record, returning: &[&str]) -> SqlResult<Compiled> {
        let mut params = ParamList::new();
        let sql = self.compile_update(query, values, returning, &mut params)?;
        Ok(self.finish(StatementKind::Update, sql, params))
    }

    /// Compile a DELETE of the rows matched by the query's WHERE clause.
    pub fn delete(&self, query: &Query) -> SqlResult<Compiled> {
        let mut params = ParamList::new();
        let sql = self.compile_delete(query, &mut params)?;
        Ok(self.finish(StatementKind::Delete, sql, params))
    }

    /// Insert a row, or update it when it conflicts on `conflict_target`.
    ///
    /// An empty `update` record ignores the conflict instead.
    pub fn insert_or_update(
        &self,
        query: &Query,
        insert: &Record,
        update: &Record,
        conflict_target: &[&str],
    ) -> SqlResult<Compiled> {
        let mut params = ParamList::new();
        let sql = self.compile_upsert(query, insert, update, conflict_target, &mut params)?;
        Ok(self.finish(StatementKind::Upsert, sql, params))
    }

    fn finish(&self, statement: StatementKind, sql: String, params: ParamList) -> Compiled {
        #[cfg(feature = "tracing")]
        {
            let logged = match self.config.max_logged_sql {
                Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(&sql, max)),
                _ => sql.clone(),
            };
            tracing::debug!(
                target: "sqlcraft.sql",
                dialect = self.dialect.name(),
                statement = statement.as_str(),
                param_count = params.len(),
                sql = %logged,
                "compiled"
            );
        }
        #[cfg(not(feature = "tracing"))]
        let _ = statement;

        Compiled {
            sql,
            params: params.into_values(),
        }
    }

    // ==================== Shared renderers ====================

    /// Capability error for the current dialect.
    pub(crate) fn unsupported(&self, feature: &'static str) -> SqlError {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            target: "sqlcraft.sql",
            dialect = self.dialect.name(),
            feature,
            "unsupported feature"
        );
        SqlError::unsupported(self.dialect.name(), feature)
    }

    pub(crate) fn require<'h, T: ?Sized>(&self, hook: Option<&'h T>, feature: &'static str) -> SqlResult<&'h T> {
        hook.ok_or_else(|| self.unsupported(feature))
    }

    /// Escape dotted segments; `*` stays bare.
    fn escape_segments(&self, segments: &[&str]) -> String {
        segments
            .iter()
            .map(|s| {
                if *s == "*" {
                    "*".to_string()
                } else {
                    self.dialect.escape_identifier(s)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Render a column reference: qualification, JSON path and alias.
    pub(crate) fn column_name(&self, name: &str) -> SqlResult<String> {
        let ident = Ident::parse(name)?;
        let mut sql = self.escape_segments(&ident.segments);
        if ident.is_json() {
            let json = self.require(self.dialect.json(), "JSON path access")?;
            sql = json.json_get(&sql, &ident.json_path);
        }
        if let Some(alias) = ident.alias {
            sql.push_str(" AS ");
            sql.push_str(&self.dialect.escape_identifier(alias));
        }
        Ok(sql)
    }

    /// Render a table name with an optional alias.
    pub(crate) fn table_name(&self, name: &str) -> SqlResult<String> {
        let ident = Ident::parse(name)?;
        if ident.is_json() {
            return Err(SqlError::malformed(format!("table name '{name}' cannot carry a JSON path")));
        }
        let mut sql = self.escape_segments(&ident.segments);
        if let Some(alias) = ident.alias {
            sql.push_str(self.dialect.table_alias_separator());
            sql.push_str(&self.dialect.escape_identifier(alias));
        }
        Ok(sql)
    }

    /// Splice a raw fragment and its values.
    pub(crate) fn raw(&self, raw: &Raw, params: &mut ParamList) -> SqlResult<String> {
        let placeholders = self.dialect.count_placeholders(raw.sql());
        if placeholders != raw.params().len() {
            return Err(SqlError::malformed(format!(
                "raw fragment has {placeholders} placeholders but {} values: {}",
                raw.params().len(),
                raw.sql()
            )));
        }
        params.extend(raw.params());
        Ok(raw.sql().to_string())
    }

    /// Render a FROM/UPDATE/DELETE table reference.
    pub(crate) fn table_ref(&self, table: &TableRef, params: &mut ParamList) -> SqlResult<String> {
        match table {
            TableRef::None => Err(SqlError::malformed("statement requires a table")),
            TableRef::Name(name) => self.table_name(name),
            TableRef::Names(names) => {
                if names.is_empty() {
                    return Err(SqlError::malformed("table list cannot be empty"));
                }
                let names = names
                    .iter()
                    .map(|n| self.table_name(n))
                    .collect::<SqlResult<Vec<_>>>()?;
                Ok(names.join(", "))
            }
            TableRef::Subquery(sub) => self.derived_table(sub, params),
            TableRef::Raw(raw) => self.raw(raw, params),
        }
    }

    /// `(SELECT ..) AS alias`, falling back to the configured synthetic alias.
    fn derived_table(&self, sub: &Subquery, params: &mut ParamList) -> SqlResult<String> {
        let query = sub.resolve();
        let sql = self.compile_select(&query, params)?;
        let alias = sub
            .get_alias()
            .unwrap_or(self.config.derived_table_alias.as_str());
        Ok(format!(
            "({sql}){}{}",
            self.dialect.table_alias_separator(),
            self.dialect.escape_identifier(alias)
        ))
    }

    /// `(SELECT ..)` without alias, for IN / EXISTS operands.
    pub(crate) fn subquery(&self, sub: &Subquery, params: &mut ParamList) -> SqlResult<String> {
        let query = sub.resolve();
        Ok(format!("({})", self.compile_select(&query, params)?))
    }
}

#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
