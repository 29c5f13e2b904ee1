//! Clause value types that make up the query tree.

use super::raw::Raw;
use super::record::Arg;
use super::subquery::Subquery;
use super::Query;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use chrono::NaiveDate;
use std::fmt;

/// Boolean connective placed before a condition.
///
/// The first condition of every level (WHERE, HAVING, ON, or a nested group)
/// never emits its separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    And,
    Or,
}

impl Separator {
    /// Parse `"and"`/`"or"` in any letter case.
    pub fn parse(s: &str) -> SqlResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Separator::And),
            "OR" => Ok(Separator::Or),
            other => Err(SqlError::malformed(format!("unknown separator '{other}'"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Separator::And => "AND",
            Separator::Or => "OR",
        }
    }
}

/// Comparison operator. Operators are interpolated into SQL, so only this
/// closed set is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    /// `<>` spelling of not-equal.
    Diamond,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl Operator {
    /// Parse an operator string, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> SqlResult<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::NotEq),
            "<>" => Ok(Operator::Diamond),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "LIKE" => Ok(Operator::Like),
            "NOT LIKE" => Ok(Operator::NotLike),
            "ILIKE" => Ok(Operator::ILike),
            "NOT ILIKE" => Ok(Operator::NotILike),
            _ => Err(SqlError::malformed(format!("unsupported operator '{s}'"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Diamond => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
        }
    }

    /// Whether the operator is a pattern match.
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            Operator::Like | Operator::NotLike | Operator::ILike | Operator::NotILike
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One ORDER BY entry: several columns sharing a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub columns: Vec<String>,
    pub direction: Direction,
}

/// Row lock requested for a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    /// Exclusive (write) lock.
    Exclusive,
    /// Shared (read) lock.
    Shared,
    /// Emitted verbatim.
    Custom(String),
}

impl From<bool> for Lock {
    fn from(exclusive: bool) -> Self {
        if exclusive { Lock::Exclusive } else { Lock::Shared }
    }
}

/// UNION / INTERSECT / EXCEPT and their ALL variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

impl SetOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            SetOperator::Union => "UNION",
            SetOperator::UnionAll => "UNION ALL",
            SetOperator::Intersect => "INTERSECT",
            SetOperator::IntersectAll => "INTERSECT ALL",
            SetOperator::Except => "EXCEPT",
            SetOperator::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// A set-operation operand combined with the main query.
#[derive(Debug, Clone)]
pub struct SetOperation {
    pub query: Subquery,
    pub operator: SetOperator,
}

/// One named common table expression.
#[derive(Debug, Clone)]
pub struct Cte {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Subquery,
}

/// The WITH clause.
#[derive(Debug, Clone, Default)]
pub struct CommonTableExpressions {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}

/// Source of an IN list.
#[derive(Debug, Clone)]
pub enum InValues {
    List(Vec<Value>),
    Raw(Raw),
    Subquery(Subquery),
}

/// Distance function for vector similarity predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorMetric {
    Euclidean,
    Cosine,
    InnerProduct,
}

/// What a FROM / INTO / DELETE clause refers to.
#[derive(Debug, Clone, Default)]
pub enum TableRef {
    /// No table; the dialect supplies its dummy table, if any.
    #[default]
    None,
    Name(String),
    /// Several tables (multi-table FROM or DELETE).
    Names(Vec<String>),
    Subquery(Box<Subquery>),
    Raw(Raw),
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::Name(name.to_string())
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::Name(name)
    }
}

impl From<Vec<&str>> for TableRef {
    fn from(names: Vec<&str>) -> Self {
        TableRef::Names(names.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for TableRef {
    fn from(names: Vec<String>) -> Self {
        TableRef::Names(names)
    }
}

impl<const N: usize> From<[&str; N]> for TableRef {
    fn from(names: [&str; N]) -> Self {
        TableRef::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Subquery> for TableRef {
    fn from(sub: Subquery) -> Self {
        TableRef::Subquery(Box::new(sub))
    }
}

impl From<Raw> for TableRef {
    fn from(raw: Raw) -> Self {
        TableRef::Raw(raw)
    }
}

/// One projected column.
#[derive(Debug, Clone)]
pub enum ColumnRef {
    Name(String),
    Raw(Raw),
    Subquery(Subquery),
}

impl ColumnRef {
    pub(crate) fn is_wildcard(&self) -> bool {
        matches!(self, ColumnRef::Name(n) if n == "*")
    }
}

/// A node of a WHERE or HAVING tree.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `column op value`
    Where {
        column: String,
        operator: Operator,
        value: Arg,
        separator: Separator,
    },
    /// Verbatim fragment.
    Raw { raw: Raw, separator: Separator },
    /// `column op column`
    Column {
        first: String,
        operator: Operator,
        second: String,
        separator: Separator,
    },
    /// `column [NOT] BETWEEN low AND high`
    Between {
        column: String,
        low: Value,
        high: Value,
        not: bool,
        separator: Separator,
    },
    /// Calendar-date comparison, lowered per dialect.
    Date {
        column: String,
        operator: Operator,
        value: NaiveDate,
        separator: Separator,
    },
    /// Calendar-date range, lowered per dialect.
    BetweenDate {
        column: String,
        from: NaiveDate,
        to: NaiveDate,
        not: bool,
        separator: Separator,
    },
    /// `column [NOT] IN (...)`
    In {
        column: String,
        values: InValues,
        not: bool,
        separator: Separator,
    },
    /// `column IS [NOT] NULL`
    Null {
        column: String,
        not: bool,
        separator: Separator,
    },
    /// `[NOT] EXISTS (subquery)`
    Exists {
        query: Subquery,
        not: bool,
        separator: Separator,
    },
    /// Parenthesized group built from the child query's own conditions.
    Nested {
        query: Box<Query>,
        separator: Separator,
    },
    /// Vector distance below a threshold.
    VectorDistance {
        column: String,
        vector: Vec<f32>,
        metric: VectorMetric,
        distance: f64,
        separator: Separator,
    },
}

impl Condition {
    pub fn separator(&self) -> Separator {
        match self {
            Condition::Where { separator, .. }
            | Condition::Raw { separator, .. }
            | Condition::Column { separator, .. }
            | Condition::Between { separator, .. }
            | Condition::Date { separator, .. }
            | Condition::BetweenDate { separator, .. }
            | Condition::In { separator, .. }
            | Condition::Null { separator, .. }
            | Condition::Exists { separator, .. }
            | Condition::Nested { separator, .. }
            | Condition::VectorDistance { separator, .. } => *separator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_is_case_insensitive() {
        assert_eq!(Separator::parse("or").unwrap(), Separator::Or);
        assert_eq!(Separator::parse("OR").unwrap(), Separator::Or);
        assert_eq!(Separator::parse(" And ").unwrap(), Separator::And);
        assert!(Separator::parse("xor").is_err());
    }

    #[test]
    fn operator_allow_list() {
        assert_eq!(Operator::parse("=").unwrap(), Operator::Eq);
        assert_eq!(Operator::parse("not  like").unwrap(), Operator::NotLike);
        assert_eq!(Operator::parse("ilike").unwrap().as_str(), "ILIKE");
        assert!(Operator::parse("= 1 OR 1 =").is_err());
        assert!(Operator::parse(";").is_err());
    }

    #[test]
    fn lock_from_bool() {
        assert_eq!(Lock::from(true), Lock::Exclusive);
        assert_eq!(Lock::from(false), Lock::Shared);
    }
}
