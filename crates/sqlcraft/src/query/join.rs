//! JOIN clauses.

use super::clause::{Operator, Separator, TableRef};
use super::raw::Raw;
use crate::error::SqlError;

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT OUTER JOIN",
            JoinKind::Right => "RIGHT OUTER JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// Right-hand side of a join predicate.
#[derive(Debug, Clone)]
pub enum JoinOperand {
    Column(String),
    Raw(Raw),
}

/// One predicate of an ON clause.
#[derive(Debug, Clone)]
pub enum JoinCondition {
    On {
        first: String,
        operator: Operator,
        second: JoinOperand,
        separator: Separator,
    },
    /// Parenthesized group holding another join's predicates.
    Nested { join: Join, separator: Separator },
}

/// A JOIN with its ON predicates.
///
/// Predicates are added with the same fluent style as WHERE conditions:
///
/// ```ignore
/// Query::table("users").join_with(JoinKind::Left, "orders", |j| {
///     j.on("users.id", "=", "orders.user_id")
///         .on_group(|g| g.on("orders.state", "=", "users.state").or_on("orders.state", "=", "orders.origin"))
/// })
/// ```
#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub conditions: Vec<JoinCondition>,
    pub(crate) build_error: Option<SqlError>,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<TableRef>) -> Self {
        Self {
            kind,
            table: table.into(),
            conditions: Vec::new(),
            build_error: None,
        }
    }

    fn child(&self) -> Self {
        Join::new(self.kind, TableRef::None)
    }

    fn record_error(&mut self, err: SqlError) {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }

    fn push_on(mut self, first: &str, op: &str, second: JoinOperand, separator: Separator) -> Self {
        match Operator::parse(op) {
            Ok(operator) => self.conditions.push(JoinCondition::On {
                first: first.to_string(),
                operator,
                second,
                separator,
            }),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Add `first op second` where both sides are columns.
    pub fn on(self, first: &str, op: &str, second: &str) -> Self {
        self.push_on(first, op, JoinOperand::Column(second.to_string()), Separator::And)
    }

    /// OR variant of [`Join::on`].
    pub fn or_on(self, first: &str, op: &str, second: &str) -> Self {
        self.push_on(first, op, JoinOperand::Column(second.to_string()), Separator::Or)
    }

    /// Add `first op <raw>`; the fragment's values are bound in place.
    pub fn on_raw(self, first: &str, op: &str, second: Raw) -> Self {
        self.push_on(first, op, JoinOperand::Raw(second), Separator::And)
    }

    /// OR variant of [`Join::on_raw`].
    pub fn or_on_raw(self, first: &str, op: &str, second: Raw) -> Self {
        self.push_on(first, op, JoinOperand::Raw(second), Separator::Or)
    }

    fn push_group<F>(mut self, f: F, separator: Separator) -> Self
    where
        F: FnOnce(Join) -> Join,
    {
        let mut nested = f(self.child());
        if let Some(err) = nested.build_error.take() {
            self.record_error(err);
        }
        self.conditions.push(JoinCondition::Nested {
            join: nested,
            separator,
        });
        self
    }

    /// Add a parenthesized group of predicates, joined with AND.
    pub fn on_group<F: FnOnce(Join) -> Join>(self, f: F) -> Self {
        self.push_group(f, Separator::And)
    }

    /// Add a parenthesized group of predicates, joined with OR.
    pub fn or_on_group<F: FnOnce(Join) -> Join>(self, f: F) -> Self {
        self.push_group(f, Separator::Or)
    }
}
