//! WHERE / HAVING trees.

use super::{Compiler, ParamList};
use crate::error::{SqlError, SqlResult};
use crate::query::{Arg, Condition, InValues};
use crate::value::Value;

impl Compiler<'_> {
    pub(crate) fn where_clause(&self, conditions: &[Condition], params: &mut ParamList) -> SqlResult<String> {
        let sql = self.conditions(conditions, params)?;
        Ok(if sql.is_empty() { sql } else { format!(" WHERE {sql}") })
    }

    pub(crate) fn having_clause(&self, conditions: &[Condition], params: &mut ParamList) -> SqlResult<String> {
        let sql = self.conditions(conditions, params)?;
        Ok(if sql.is_empty() { sql } else { format!(" HAVING {sql}") })
    }

    /// Render one level. Empty parts are skipped and the first rendered
    /// part drops its separator.
    fn conditions(&self, conditions: &[Condition], params: &mut ParamList) -> SqlResult<String> {
        let mut sql = String::new();
        for condition in conditions {
            let part = self.condition(condition, params)?;
            if part.is_empty() {
                continue;
            }
            if !sql.is_empty() {
                sql.push(' ');
                sql.push_str(condition.separator().as_str());
                sql.push(' ');
            }
            sql.push_str(&part);
        }
        Ok(sql)
    }

    /// Placeholder for a value, or the raw fragment.
    pub(crate) fn arg(&self, arg: &Arg, params: &mut ParamList) -> SqlResult<String> {
        match arg {
            Arg::Value(value) => Ok(params.bind(value.clone()).to_string()),
            Arg::Raw(raw) => self.raw(raw, params),
        }
    }

    fn condition(&self, condition: &Condition, params: &mut ParamList) -> SqlResult<String> {
        match condition {
            Condition::Where {
                column,
                operator,
                value,
                ..
            } => {
                let column = self.column_name(column)?;
                let value = self.arg(value, params)?;
                Ok(format!("{column} {operator} {value}"))
            }
            Condition::Raw { raw, .. } => self.raw(raw, params),
            Condition::Column {
                first,
                operator,
                second,
                ..
            } => Ok(format!(
                "{} {operator} {}",
                self.column_name(first)?,
                self.column_name(second)?
            )),
            Condition::Between {
                column,
                low,
                high,
                not,
                ..
            } => {
                let column = self.column_name(column)?;
                let low = params.bind(low.clone());
                let high = params.bind(high.clone());
                Ok(format!("{column} {}BETWEEN {low} AND {high}", not_keyword(*not)))
            }
            Condition::Date {
                column,
                operator,
                value,
                ..
            } => {
                let dates = self.require(self.dialect.dates(), "date comparisons")?;
                let column = self.column_name(column)?;
                let value = params.bind(Value::Text(self.config.format_date(*value)?));
                Ok(format!("{} {operator} {value}", dates.date_expression(&column)))
            }
            Condition::BetweenDate {
                column,
                from,
                to,
                not,
                ..
            } => {
                let dates = self.require(self.dialect.dates(), "date comparisons")?;
                let column = self.column_name(column)?;
                let not = not_keyword(*not);
                if dates.expands_day_bounds() {
                    params.push(Value::Text(self.config.start_of_day(*from)?));
                    params.push(Value::Text(self.config.end_of_day(*to)?));
                    Ok(format!("{column} {not}BETWEEN ? AND ?"))
                } else {
                    params.push(Value::Text(self.config.format_date(*from)?));
                    params.push(Value::Text(self.config.format_date(*to)?));
                    Ok(format!("{} {not}BETWEEN ? AND ?", dates.date_expression(&column)))
                }
            }
            Condition::In {
                column,
                values,
                not,
                ..
            } => {
                let column = self.column_name(column)?;
                let not = not_keyword(*not);
                let list = match values {
                    InValues::List(values) => {
                        if values.is_empty() {
                            return Err(SqlError::malformed(format!(
                                "IN list for {column} must contain at least one value"
                            )));
                        }
                        let placeholders = values
                            .iter()
                            .map(|v| params.bind(v.clone()))
                            .collect::<Vec<_>>();
                        format!("({})", placeholders.join(", "))
                    }
                    InValues::Raw(raw) => format!("({})", self.raw(raw, params)?),
                    InValues::Subquery(sub) => self.subquery(sub, params)?,
                };
                Ok(format!("{column} {not}IN {list}"))
            }
            Condition::Null { column, not, .. } => Ok(format!(
                "{} IS {}NULL",
                self.column_name(column)?,
                not_keyword(*not)
            )),
            Condition::Exists { query, not, .. } => Ok(format!(
                "{}EXISTS {}",
                not_keyword(*not),
                self.subquery(query, params)?
            )),
            Condition::Nested { query, .. } => {
                let inner = self.conditions(query.wheres(), params)?;
                Ok(if inner.is_empty() { inner } else { format!("({inner})") })
            }
            Condition::VectorDistance {
                column,
                vector,
                metric,
                distance,
                ..
            } => {
                let vectors = self.require(self.dialect.vectors(), "vector distance")?;
                let column = self.column_name(column)?;
                let expression = vectors.distance_expression(&column, *metric, vector.len())?;
                params.push(vectors.vector_value(vector));
                let distance = params.bind(Value::Float(*distance));
                Ok(format!("{expression} < {distance}"))
            }
        }
    }
}

fn not_keyword(not: bool) -> &'static str {
    if not { "NOT " } else { "" }
}
