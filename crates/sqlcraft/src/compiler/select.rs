//! SELECT assembly.
//!
//! Clause order: prefix, WITH, set-operation operands, then
//! `SELECT [DISTINCT] cols FROM t [hint] joins WHERE GROUP BY HAVING ORDER BY`,
//! row limiting and the lock clause. Row limiting covers the whole compound
//! (operands and body), like a trailing `LIMIT` does.

use super::{Compiler, ParamList};
use crate::error::SqlResult;
use crate::query::{ColumnRef, CommonTableExpressions, Join, JoinCondition, JoinOperand, Query, TableRef};

impl Compiler<'_> {
    pub(crate) fn compile_select(&self, query: &Query, params: &mut ParamList) -> SqlResult<String> {
        query.validate()?;

        let mut sql = String::new();
        if let Some(prefix) = query.get_prefix() {
            sql.push_str(prefix);
            sql.push(' ');
        }
        sql.push_str(&self.common_table_expressions(query.common_table_expressions(), params)?);

        let mut body = String::new();
        for operation in query.set_operations() {
            let operand = operation.query.resolve();
            body.push_str(&self.compile_select(&operand, params)?);
            body.push(' ');
            body.push_str(operation.operator.as_str());
            body.push(' ');
        }
        body.push_str("SELECT ");
        if query.is_distinct() {
            body.push_str("DISTINCT ");
        }
        body.push_str(&self.projection(query.columns(), params)?);
        body.push_str(&self.from_clause(query, params)?);
        body.push_str(&self.joins(query.joins(), params)?);
        body.push_str(&self.where_clause(query.wheres(), params)?);
        body.push_str(&self.group_by(query.groupings())?);
        body.push_str(&self.having_clause(query.havings(), params)?);
        let order_by = self.order_by(query)?;
        let ordered = !order_by.is_empty();
        body.push_str(&order_by);

        sql.push_str(&self.dialect.limit_select(body, ordered, query.get_limit(), query.get_offset()));
        if let Some(lock) = query.get_lock() {
            sql.push_str(&self.dialect.lock_clause(lock));
        }
        Ok(sql)
    }

    fn common_table_expressions(
        &self,
        ctes: &CommonTableExpressions,
        params: &mut ParamList,
    ) -> SqlResult<String> {
        if ctes.ctes.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(ctes.ctes.len());
        for cte in &ctes.ctes {
            let mut part = self.dialect.escape_identifier(&cte.name);
            if !cte.columns.is_empty() {
                let columns = cte
                    .columns
                    .iter()
                    .map(|c| self.dialect.escape_identifier(c))
                    .collect::<Vec<_>>();
                part.push_str(&format!(" ({})", columns.join(", ")));
            }
            let body = cte.query.resolve();
            part.push_str(&format!(" AS ({})", self.compile_select(&body, params)?));
            parts.push(part);
        }
        let recursive = if ctes.recursive {
            self.dialect.recursive_keyword()
        } else {
            ""
        };
        Ok(format!("WITH {recursive}{} ", parts.join(", ")))
    }

    fn projection(&self, columns: &[ColumnRef], params: &mut ParamList) -> SqlResult<String> {
        let mut parts = Vec::with_capacity(columns.len());
        for column in columns {
            let part = match column {
                ColumnRef::Name(name) => self.column_name(name)?,
                ColumnRef::Raw(raw) => self.raw(raw, params)?,
                ColumnRef::Subquery(sub) => {
                    let mut sql = self.subquery(sub, params)?;
                    if let Some(alias) = sub.get_alias() {
                        sql.push_str(" AS ");
                        sql.push_str(&self.dialect.escape_identifier(alias));
                    }
                    sql
                }
            };
            parts.push(part);
        }
        Ok(parts.join(", "))
    }

    fn from_clause(&self, query: &Query, params: &mut ParamList) -> SqlResult<String> {
        if let TableRef::None = query.table_ref() {
            return Ok(match self.dialect.dummy_table() {
                Some(dummy) => format!(" FROM {dummy}"),
                None => String::new(),
            });
        }
        let table = query.table_ref();
        let mut sql = format!(" FROM {}", self.table_ref(table, params)?);
        // Hints only attach to base tables.
        if let (Some(lock), TableRef::Name(_) | TableRef::Names(_)) = (query.get_lock(), table) {
            sql.push_str(&self.dialect.table_hint(lock));
        }
        Ok(sql)
    }

    pub(crate) fn joins(&self, joins: &[Join], params: &mut ParamList) -> SqlResult<String> {
        let mut sql = String::new();
        for join in joins {
            sql.push(' ');
            sql.push_str(join.kind.keyword());
            sql.push(' ');
            sql.push_str(&self.table_ref(&join.table, params)?);
            let on = self.join_conditions(&join.conditions, params)?;
            if !on.is_empty() {
                sql.push_str(" ON ");
                sql.push_str(&on);
            }
        }
        Ok(sql)
    }

    fn join_conditions(&self, conditions: &[JoinCondition], params: &mut ParamList) -> SqlResult<String> {
        let mut sql = String::new();
        for condition in conditions {
            let (part, separator) = match condition {
                JoinCondition::On {
                    first,
                    operator,
                    second,
                    separator,
                } => {
                    let first = self.column_name(first)?;
                    let second = match second {
                        JoinOperand::Column(column) => self.column_name(column)?,
                        JoinOperand::Raw(raw) => self.raw(raw, params)?,
                    };
                    (format!("{first} {operator} {second}"), *separator)
                }
                JoinCondition::Nested { join, separator } => {
                    let inner = self.join_conditions(&join.conditions, params)?;
                    if inner.is_empty() {
                        continue;
                    }
                    (format!("({inner})"), *separator)
                }
            };
            if !sql.is_empty() {
                sql.push(' ');
                sql.push_str(separator.as_str());
                sql.push(' ');
            }
            sql.push_str(&part);
        }
        Ok(sql)
    }

    fn group_by(&self, groupings: &[String]) -> SqlResult<String> {
        if groupings.is_empty() {
            return Ok(String::new());
        }
        let columns = groupings
            .iter()
            .map(|c| self.column_name(c))
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(format!(" GROUP BY {}", columns.join(", ")))
    }

    fn order_by(&self, query: &Query) -> SqlResult<String> {
        let mut parts = Vec::new();
        for ordering in query.orderings() {
            for column in &ordering.columns {
                parts.push(format!("{} {}", self.column_name(column)?, ordering.direction.as_str()));
            }
        }
        if parts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(" ORDER BY {}", parts.join(", ")))
    }
}
