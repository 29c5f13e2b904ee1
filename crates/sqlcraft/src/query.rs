//! Query builder and intermediate representation.
//!
//! A [`Query`] is a dialect-agnostic clause tree. It is built with consuming
//! fluent calls and then handed, read-only, to a
//! [`Compiler`](crate::compiler::Compiler).
//!
//! ```ignore
//! use sqlcraft::prelude::*;
//!
//! let q = Query::table("users")
//!     .select(["id", "name"])
//!     .gt("age", 18)
//!     .or_where_group(|q| q.eq("role", "admin").is_not_null("verified_at"))
//!     .order_by_desc("created_at")
//!     .limit(10);
//! ```
//!
//! Builder calls never fail. Invalid input (an unknown operator, an empty IN
//! list) is recorded on the query and returned by the compiler before any SQL
//! is produced.

mod clause;
mod join;
mod raw;
mod record;
mod subquery;

pub use clause::{
    ColumnRef, CommonTableExpressions, Condition, Cte, Direction, InValues, Lock, Operator,
    Ordering, Separator, SetOperation, SetOperator, TableRef, VectorMetric,
};
pub use join::{Join, JoinCondition, JoinKind, JoinOperand};
pub use raw::{Raw, raw};
pub use record::{Arg, Record};
pub use subquery::{BuilderFn, Subquery};

use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use chrono::NaiveDate;

/// The clause tree of one statement.
#[derive(Debug, Clone)]
pub struct Query {
    table: TableRef,
    columns: Vec<ColumnRef>,
    distinct: bool,
    wheres: Vec<Condition>,
    joins: Vec<Join>,
    groupings: Vec<String>,
    havings: Vec<Condition>,
    orderings: Vec<Ordering>,
    limit: Option<u32>,
    offset: Option<u32>,
    lock: Option<Lock>,
    prefix: Option<String>,
    set_operations: Vec<SetOperation>,
    common_table_expressions: CommonTableExpressions,
    build_error: Option<SqlError>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    /// Create an empty query with no table.
    pub fn new() -> Self {
        Self {
            table: TableRef::None,
            columns: vec![ColumnRef::Name("*".to_string())],
            distinct: false,
            wheres: Vec::new(),
            joins: Vec::new(),
            groupings: Vec::new(),
            havings: Vec::new(),
            orderings: Vec::new(),
            limit: None,
            offset: None,
            lock: None,
            prefix: None,
            set_operations: Vec::new(),
            common_table_expressions: CommonTableExpressions::default(),
            build_error: None,
        }
    }

    /// Create a query against a table.
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self::new().from(table)
    }

    /// Fresh child query for nested builder callbacks.
    fn child(&self) -> Self {
        Self::new()
    }

    fn record_error(&mut self, err: SqlError) {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }

    fn absorb_error(&mut self, child: &mut Query) {
        if let Some(err) = child.build_error.take() {
            self.record_error(err);
        }
    }

    /// Return the first error recorded while building.
    pub fn validate(&self) -> SqlResult<()> {
        match &self.build_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    // ==================== Source ====================

    /// Set the FROM table.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the INSERT/UPDATE/DELETE target table.
    pub fn into_table(self, table: impl Into<TableRef>) -> Self {
        self.from(table)
    }

    /// Use a derived table built by a callback. It receives the compiler's
    /// configured synthetic alias.
    pub fn from_query<F: FnOnce(Query) -> Query>(mut self, f: F) -> Self {
        let mut child = f(self.child());
        self.absorb_error(&mut child);
        self.table = TableRef::Subquery(Box::new(Subquery::new(child)));
        self
    }

    /// Use a derived table built by a callback, with an explicit alias.
    pub fn from_query_as<F: FnOnce(Query) -> Query>(mut self, f: F, alias: &str) -> Self {
        let mut child = f(self.child());
        self.absorb_error(&mut child);
        self.table = TableRef::Subquery(Box::new(Subquery::new(child).alias(alias)));
        self
    }

    // ==================== Projection ====================

    /// Replace the projected columns.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns
            .into_iter()
            .map(|c| ColumnRef::Name(c.into()))
            .collect();
        if self.columns.is_empty() {
            self.columns.push(ColumnRef::Name("*".to_string()));
        }
        self
    }

    fn push_column(&mut self, column: ColumnRef) {
        if self.columns.len() == 1 && self.columns[0].is_wildcard() {
            self.columns[0] = column;
        } else {
            self.columns.push(column);
        }
    }

    /// Append one projected column.
    pub fn add_select(mut self, column: &str) -> Self {
        self.push_column(ColumnRef::Name(column.to_string()));
        self
    }

    /// Append a raw projection.
    pub fn select_raw(mut self, raw: Raw) -> Self {
        self.push_column(ColumnRef::Raw(raw));
        self
    }

    /// Append a scalar subquery projection; give it an alias.
    pub fn select_subquery(mut self, sub: Subquery) -> Self {
        self.push_column(ColumnRef::Subquery(sub));
        self
    }

    /// SELECT DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ==================== WHERE ====================

    fn push_where(mut self, condition: Condition) -> Self {
        self.wheres.push(condition);
        self
    }

    fn push_compare(mut self, column: &str, op: &str, value: Arg, separator: Separator) -> Self {
        match Operator::parse(op) {
            Ok(operator) => self.push_where(Condition::Where {
                column: column.to_string(),
                operator,
                value,
                separator,
            }),
            Err(e) => {
                self.record_error(e);
                self
            }
        }
    }

    /// Add `column op value`, joined with AND.
    pub fn and_where(self, column: &str, op: &str, value: impl Into<Arg>) -> Self {
        self.push_compare(column, op, value.into(), Separator::And)
    }

    /// Add `column op value`, joined with OR.
    pub fn or_where(self, column: &str, op: &str, value: impl Into<Arg>) -> Self {
        self.push_compare(column, op, value.into(), Separator::Or)
    }

    /// Add `column op value` with a separator given as text (`"and"`, `"OR"`, ...).
    pub fn where_sep(mut self, separator: &str, column: &str, op: &str, value: impl Into<Arg>) -> Self {
        match Separator::parse(separator) {
            Ok(sep) => self.push_compare(column, op, value.into(), sep),
            Err(e) => {
                self.record_error(e);
                self
            }
        }
    }

    /// Add WHERE: column = value
    pub fn eq(self, column: &str, value: impl Into<Arg>) -> Self {
        self.and_where(column, "=", value)
    }

    /// Add WHERE: column != value
    pub fn ne(self, column: &str, value: impl Into<Arg>) -> Self {
        self.and_where(column, "!=", value)
    }

    /// Add WHERE: column > value
    pub fn gt(self, column: &str, value: impl Into<Arg>) -> Self {
        self.and_where(column, ">", value)
    }

    /// Add WHERE: column >= value
    pub fn gte(self, column: &str, value: impl Into<Arg>) -> Self {
        self.and_where(column, ">=", value)
    }

    /// Add WHERE: column < value
    pub fn lt(self, column: &str, value: impl Into<Arg>) -> Self {
        self.and_where(column, "<", value)
    }

    /// Add WHERE: column <= value
    pub fn lte(self, column: &str, value: impl Into<Arg>) -> Self {
        self.and_where(column, "<=", value)
    }

    /// Add WHERE: column LIKE pattern
    pub fn like(self, column: &str, pattern: impl Into<Arg>) -> Self {
        self.and_where(column, "LIKE", pattern)
    }

    /// Add a raw condition.
    pub fn where_raw(self, raw: Raw) -> Self {
        self.push_where(Condition::Raw {
            raw,
            separator: Separator::And,
        })
    }

    /// OR variant of [`Query::where_raw`].
    pub fn or_where_raw(self, raw: Raw) -> Self {
        self.push_where(Condition::Raw {
            raw,
            separator: Separator::Or,
        })
    }

    fn push_column_compare(mut self, first: &str, op: &str, second: &str, separator: Separator) -> Self {
        match Operator::parse(op) {
            Ok(operator) => self.push_where(Condition::Column {
                first: first.to_string(),
                operator,
                second: second.to_string(),
                separator,
            }),
            Err(e) => {
                self.record_error(e);
                self
            }
        }
    }

    /// Compare two columns.
    pub fn where_column(self, first: &str, op: &str, second: &str) -> Self {
        self.push_column_compare(first, op, second, Separator::And)
    }

    /// OR variant of [`Query::where_column`].
    pub fn or_where_column(self, first: &str, op: &str, second: &str) -> Self {
        self.push_column_compare(first, op, second, Separator::Or)
    }

    fn push_between(self, column: &str, low: Value, high: Value, not: bool, separator: Separator) -> Self {
        self.push_where(Condition::Between {
            column: column.to_string(),
            low,
            high,
            not,
            separator,
        })
    }

    /// Add WHERE: column BETWEEN low AND high
    pub fn between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_between(column, low.into(), high.into(), false, Separator::And)
    }

    /// Add WHERE: column NOT BETWEEN low AND high
    pub fn not_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_between(column, low.into(), high.into(), true, Separator::And)
    }

    /// Add OR: column BETWEEN low AND high
    pub fn or_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_between(column, low.into(), high.into(), false, Separator::Or)
    }

    /// Add OR: column NOT BETWEEN low AND high
    pub fn or_not_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_between(column, low.into(), high.into(), true, Separator::Or)
    }

    fn push_date(mut self, column: &str, op: &str, value: NaiveDate, separator: Separator) -> Self {
        match Operator::parse(op) {
            Ok(operator) if operator.is_pattern() => {
                self.record_error(SqlError::malformed(format!(
                    "pattern operator '{operator}' cannot compare dates"
                )));
                self
            }
            Ok(operator) => self.push_where(Condition::Date {
                column: column.to_string(),
                operator,
                value,
                separator,
            }),
            Err(e) => {
                self.record_error(e);
                self
            }
        }
    }

    /// Compare the calendar date of a column.
    pub fn where_date(self, column: &str, op: &str, value: NaiveDate) -> Self {
        self.push_date(column, op, value, Separator::And)
    }

    /// OR variant of [`Query::where_date`].
    pub fn or_where_date(self, column: &str, op: &str, value: NaiveDate) -> Self {
        self.push_date(column, op, value, Separator::Or)
    }

    fn push_between_date(self, column: &str, from: NaiveDate, to: NaiveDate, not: bool, separator: Separator) -> Self {
        self.push_where(Condition::BetweenDate {
            column: column.to_string(),
            from,
            to,
            not,
            separator,
        })
    }

    /// Match rows whose date falls within `[from, to]`, both days inclusive.
    pub fn between_date(self, column: &str, from: NaiveDate, to: NaiveDate) -> Self {
        self.push_between_date(column, from, to, false, Separator::And)
    }

    /// Negated [`Query::between_date`].
    pub fn not_between_date(self, column: &str, from: NaiveDate, to: NaiveDate) -> Self {
        self.push_between_date(column, from, to, true, Separator::And)
    }

    /// OR variant of [`Query::between_date`].
    pub fn or_between_date(self, column: &str, from: NaiveDate, to: NaiveDate) -> Self {
        self.push_between_date(column, from, to, false, Separator::Or)
    }

    fn push_in(mut self, column: &str, values: InValues, not: bool, separator: Separator) -> Self {
        if matches!(&values, InValues::List(v) if v.is_empty()) {
            self.record_error(SqlError::malformed(format!(
                "IN list for '{column}' must contain at least one value"
            )));
            return self;
        }
        self.push_where(Condition::In {
            column: column.to_string(),
            values,
            not,
            separator,
        })
    }

    fn list<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> InValues {
        InValues::List(values.into_iter().map(Into::into).collect())
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_in(column, Self::list(values), false, Separator::And)
    }

    /// Add WHERE: column NOT IN (values...)
    pub fn not_in<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_in(column, Self::list(values), true, Separator::And)
    }

    /// Add OR: column IN (values...)
    pub fn or_in<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_in(column, Self::list(values), false, Separator::Or)
    }

    /// Add OR: column NOT IN (values...)
    pub fn or_not_in<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push_in(column, Self::list(values), true, Separator::Or)
    }

    /// Add WHERE: column IN (<raw>)
    pub fn in_raw(self, column: &str, raw: Raw) -> Self {
        self.push_in(column, InValues::Raw(raw), false, Separator::And)
    }

    /// Add WHERE: column IN (<subquery>)
    pub fn in_subquery(self, column: &str, sub: impl Into<Subquery>) -> Self {
        self.push_in(column, InValues::Subquery(sub.into()), false, Separator::And)
    }

    /// Add WHERE: column IN (<query built by the callback>)
    pub fn in_query<F: FnOnce(Query) -> Query>(mut self, column: &str, f: F) -> Self {
        let mut child = f(self.child());
        self.absorb_error(&mut child);
        self.push_in(column, InValues::Subquery(Subquery::new(child)), false, Separator::And)
    }

    /// Add WHERE: column NOT IN (<query built by the callback>)
    pub fn not_in_query<F: FnOnce(Query) -> Query>(mut self, column: &str, f: F) -> Self {
        let mut child = f(self.child());
        self.absorb_error(&mut child);
        self.push_in(column, InValues::Subquery(Subquery::new(child)), true, Separator::And)
    }

    fn push_null(self, column: &str, not: bool, separator: Separator) -> Self {
        self.push_where(Condition::Null {
            column: column.to_string(),
            not,
            separator,
        })
    }

    /// Add WHERE: column IS NULL
    pub fn is_null(self, column: &str) -> Self {
        self.push_null(column, false, Separator::And)
    }

    /// Add WHERE: column IS NOT NULL
    pub fn is_not_null(self, column: &str) -> Self {
        self.push_null(column, true, Separator::And)
    }

    /// Add OR: column IS NULL
    pub fn or_is_null(self, column: &str) -> Self {
        self.push_null(column, false, Separator::Or)
    }

    /// Add OR: column IS NOT NULL
    pub fn or_is_not_null(self, column: &str) -> Self {
        self.push_null(column, true, Separator::Or)
    }

    fn push_exists<F: FnOnce(Query) -> Query>(mut self, f: F, not: bool, separator: Separator) -> Self {
        let mut child = f(self.child());
        self.absorb_error(&mut child);
        self.push_where(Condition::Exists {
            query: Subquery::new(child),
            not,
            separator,
        })
    }

    /// Add WHERE EXISTS (<query built by the callback>)
    pub fn exists<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_exists(f, false, Separator::And)
    }

    /// Add WHERE NOT EXISTS (...)
    pub fn not_exists<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_exists(f, true, Separator::And)
    }

    /// Add OR EXISTS (...)
    pub fn or_exists<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_exists(f, false, Separator::Or)
    }

    /// Add OR NOT EXISTS (...)
    pub fn or_not_exists<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_exists(f, true, Separator::Or)
    }

    /// Add EXISTS over an existing subquery.
    pub fn exists_query(self, sub: impl Into<Subquery>, not: bool) -> Self {
        self.push_where(Condition::Exists {
            query: sub.into(),
            not,
            separator: Separator::And,
        })
    }

    fn push_group<F: FnOnce(Query) -> Query>(mut self, f: F, separator: Separator) -> Self {
        let mut child = f(self.child());
        self.absorb_error(&mut child);
        self.push_where(Condition::Nested {
            query: Box::new(child),
            separator,
        })
    }

    /// Add a parenthesized group of conditions, joined with AND.
    pub fn where_group<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_group(f, Separator::And)
    }

    /// Add a parenthesized group of conditions, joined with OR.
    pub fn or_where_group<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_group(f, Separator::Or)
    }

    /// Keep rows whose vector column is within `distance` of `vector`.
    pub fn where_vector_distance(self, column: &str, vector: Vec<f32>, metric: VectorMetric, distance: f64) -> Self {
        self.push_where(Condition::VectorDistance {
            column: column.to_string(),
            vector,
            metric,
            distance,
            separator: Separator::And,
        })
    }

    /// Apply `f` only when `condition` holds.
    ///
    /// # Example
    /// ```ignore
    /// let q = Query::table("users").when(name.is_some(), |q| q.eq("name", name.clone()));
    /// ```
    pub fn when<F: FnOnce(Query) -> Query>(self, condition: bool, f: F) -> Self {
        if condition { f(self) } else { self }
    }

    // ==================== JOIN ====================

    fn push_join(mut self, mut join: Join) -> Self {
        if let Some(err) = join.build_error.take() {
            self.record_error(err);
        }
        self.joins.push(join);
        self
    }

    /// Add INNER JOIN table ON first op second.
    pub fn join(self, table: impl Into<TableRef>, first: &str, op: &str, second: &str) -> Self {
        self.push_join(Join::new(JoinKind::Inner, table).on(first, op, second))
    }

    /// Add LEFT OUTER JOIN.
    pub fn left_join(self, table: impl Into<TableRef>, first: &str, op: &str, second: &str) -> Self {
        self.push_join(Join::new(JoinKind::Left, table).on(first, op, second))
    }

    /// Add RIGHT OUTER JOIN.
    pub fn right_join(self, table: impl Into<TableRef>, first: &str, op: &str, second: &str) -> Self {
        self.push_join(Join::new(JoinKind::Right, table).on(first, op, second))
    }

    /// Add FULL OUTER JOIN.
    pub fn full_join(self, table: impl Into<TableRef>, first: &str, op: &str, second: &str) -> Self {
        self.push_join(Join::new(JoinKind::Full, table).on(first, op, second))
    }

    /// Add CROSS JOIN.
    pub fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.push_join(Join::new(JoinKind::Cross, table))
    }

    /// Add a join whose ON predicates are built by the callback.
    pub fn join_with<F: FnOnce(Join) -> Join>(self, kind: JoinKind, table: impl Into<TableRef>, f: F) -> Self {
        let join = f(Join::new(kind, table));
        self.push_join(join)
    }

    // ==================== GROUP BY / HAVING ====================

    /// Append GROUP BY columns.
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groupings.extend(columns.into_iter().map(Into::into));
        self
    }

    fn push_having(mut self, column: &str, op: &str, value: Arg, separator: Separator) -> Self {
        match Operator::parse(op) {
            Ok(operator) => self.havings.push(Condition::Where {
                column: column.to_string(),
                operator,
                value,
                separator,
            }),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Add HAVING column op value.
    pub fn having(self, column: &str, op: &str, value: impl Into<Arg>) -> Self {
        self.push_having(column, op, value.into(), Separator::And)
    }

    /// OR variant of [`Query::having`].
    pub fn or_having(self, column: &str, op: &str, value: impl Into<Arg>) -> Self {
        self.push_having(column, op, value.into(), Separator::Or)
    }

    /// Add a raw HAVING condition, e.g. `COUNT(*) > ?`.
    pub fn having_raw(mut self, raw: Raw) -> Self {
        self.havings.push(Condition::Raw {
            raw,
            separator: Separator::And,
        });
        self
    }

    // ==================== ORDER BY ====================

    /// Add ORDER BY column with a direction.
    pub fn order_by(self, column: &str, direction: Direction) -> Self {
        self.order_by_columns([column], direction)
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(column, Direction::Asc)
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, Direction::Desc)
    }

    /// Add ORDER BY over several columns sharing a direction.
    pub fn order_by_columns<I, S>(mut self, columns: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if !columns.is_empty() {
            self.orderings.push(Ordering { columns, direction });
        }
        self
    }

    // ==================== LIMIT / OFFSET ====================

    /// Set LIMIT.
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: u32) -> Self {
        self.offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: u32, per_page: u32) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1).saturating_mul(size));
        self
    }

    // ==================== Locking / prefix ====================

    /// Request a row lock.
    pub fn lock(mut self, lock: impl Into<Lock>) -> Self {
        self.lock = Some(lock.into());
        self
    }

    /// Exclusive lock (FOR UPDATE and equivalents).
    pub fn lock_for_update(self) -> Self {
        self.lock(Lock::Exclusive)
    }

    /// Shared lock (FOR SHARE and equivalents).
    pub fn shared_lock(self) -> Self {
        self.lock(Lock::Shared)
    }

    /// Emit a lock clause verbatim.
    pub fn lock_raw(self, clause: &str) -> Self {
        self.lock(Lock::Custom(clause.to_string()))
    }

    /// Verbatim text placed before the statement, e.g. an optimizer hint.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    // ==================== Set operations ====================

    fn push_set_operation(mut self, sub: Subquery, operator: SetOperator) -> Self {
        self.set_operations.push(SetOperation {
            query: sub,
            operator,
        });
        self
    }

    fn push_set_operation_with<F: FnOnce(Query) -> Query>(mut self, f: F, operator: SetOperator) -> Self {
        let mut child = f(self.child());
        self.absorb_error(&mut child);
        self.push_set_operation(Subquery::new(child), operator)
    }

    /// Combine with `operand UNION`.
    pub fn union(self, operand: impl Into<Subquery>) -> Self {
        self.push_set_operation(operand.into(), SetOperator::Union)
    }

    /// Combine with `operand UNION ALL`.
    pub fn union_all(self, operand: impl Into<Subquery>) -> Self {
        self.push_set_operation(operand.into(), SetOperator::UnionAll)
    }

    /// Combine with `operand INTERSECT`.
    pub fn intersect(self, operand: impl Into<Subquery>) -> Self {
        self.push_set_operation(operand.into(), SetOperator::Intersect)
    }

    /// Combine with `operand INTERSECT ALL`.
    pub fn intersect_all(self, operand: impl Into<Subquery>) -> Self {
        self.push_set_operation(operand.into(), SetOperator::IntersectAll)
    }

    /// Combine with `operand EXCEPT`.
    pub fn except(self, operand: impl Into<Subquery>) -> Self {
        self.push_set_operation(operand.into(), SetOperator::Except)
    }

    /// Combine with `operand EXCEPT ALL`.
    pub fn except_all(self, operand: impl Into<Subquery>) -> Self {
        self.push_set_operation(operand.into(), SetOperator::ExceptAll)
    }

    /// UNION with an operand built by the callback.
    pub fn union_with<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_set_operation_with(f, SetOperator::Union)
    }

    /// UNION ALL with an operand built by the callback.
    pub fn union_all_with<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_set_operation_with(f, SetOperator::UnionAll)
    }

    /// INTERSECT with an operand built by the callback.
    pub fn intersect_with<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_set_operation_with(f, SetOperator::Intersect)
    }

    /// EXCEPT with an operand built by the callback.
    pub fn except_with<F: FnOnce(Query) -> Query>(self, f: F) -> Self {
        self.push_set_operation_with(f, SetOperator::Except)
    }

    // ==================== CTE ====================

    fn push_cte(mut self, name: &str, columns: &[&str], query: Subquery, recursive: bool) -> Self {
        if name.trim().is_empty() {
            self.record_error(SqlError::malformed("CTE name cannot be empty"));
            return self;
        }
        self.common_table_expressions.recursive |= recursive;
        self.common_table_expressions.ctes.push(Cte {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            query,
        });
        self
    }

    /// Add a common table expression.
    ///
    /// # Example
    /// ```ignore
    /// Query::table("active")
    ///     .with("active", &[], Query::table("users").eq("active", true))
    /// ```
    pub fn with(self, name: &str, columns: &[&str], query: impl Into<Subquery>) -> Self {
        self.push_cte(name, columns, query.into(), false)
    }

    /// Add a recursive common table expression; the WITH clause becomes
    /// `WITH RECURSIVE`.
    pub fn with_recursive(self, name: &str, columns: &[&str], query: impl Into<Subquery>) -> Self {
        self.push_cte(name, columns, query.into(), true)
    }

    // ==================== Accessors ====================

    pub fn table_ref(&self) -> &TableRef {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn wheres(&self) -> &[Condition] {
        &self.wheres
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn groupings(&self) -> &[String] {
        &self.groupings
    }

    pub fn havings(&self) -> &[Condition] {
        &self.havings
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub fn get_limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn get_lock(&self) -> Option<&Lock> {
        self.lock.as_ref()
    }

    pub fn get_prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn set_operations(&self) -> &[SetOperation] {
        &self.set_operations
    }

    pub fn common_table_expressions(&self) -> &CommonTableExpressions {
        &self.common_table_expressions
    }
}

#[cfg(test)]
mod tests;
