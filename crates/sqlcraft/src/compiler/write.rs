//! INSERT, UPDATE, DELETE and upsert assembly.

use super::{Compiler, ParamList};
use crate::dialect::Returning;
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::query::{Arg, Query, Record, TableRef};

/// One `SET` target. JSON-path assignments to the same column share a slot
/// and fold into one nested set-expression.
enum Slot<'r> {
    Plain {
        segments: Vec<&'r str>,
        arg: &'r Arg,
    },
    Json {
        segments: Vec<&'r str>,
        sets: Vec<(Vec<&'r str>, &'r Arg)>,
    },
}

/// Rendered RETURNING clause and where it goes.
#[derive(Default)]
struct ReturningClause {
    inline: String,
    trailing: String,
}

impl Compiler<'_> {
    fn returning_clause(
        &self,
        hook: &dyn Returning,
        columns: &[&str],
    ) -> SqlResult<ReturningClause> {
        let columns = columns
            .iter()
            .map(|c| self.column_name(c))
            .collect::<SqlResult<Vec<_>>>()?;
        let clause = hook.returning_clause(&columns);
        Ok(if hook.is_inline() {
            ReturningClause {
                inline: clause,
                trailing: String::new(),
            }
        } else {
            ReturningClause {
                inline: String::new(),
                trailing: clause,
            }
        })
    }

    /// INSERT targets a single named (or raw) table.
    fn insert_target(&self, table: &TableRef, params: &mut ParamList) -> SqlResult<String> {
        match table {
            TableRef::Name(name) => self.table_name(name),
            TableRef::Raw(raw) => self.raw(raw, params),
            _ => Err(SqlError::malformed("INSERT requires a single target table")),
        }
    }

    pub(crate) fn compile_insert(
        &self,
        query: &Query,
        rows: &[Record],
        returning: &[&str],
        keyword: &str,
        params: &mut ParamList,
    ) -> SqlResult<String> {
        query.validate()?;
        let Some(first) = rows.first() else {
            return Err(SqlError::malformed("INSERT requires at least one row"));
        };
        let columns: Vec<&str> = first.columns().collect();
        if columns.is_empty() && rows.len() > 1 {
            return Err(SqlError::malformed("multi-row INSERT rows cannot be empty"));
        }
        for (i, row) in rows.iter().enumerate().skip(1) {
            if row.len() != columns.len() || columns.iter().any(|c| row.get(c).is_none()) {
                return Err(SqlError::malformed(format!(
                    "INSERT row {i} has a different column set than the first row"
                )));
            }
        }

        let returning = if returning.is_empty() {
            ReturningClause::default()
        } else {
            let hook = self.require(self.dialect.returning(), "RETURNING")?;
            self.returning_clause(hook, returning)?
        };

        let table = self.insert_target(query.table_ref(), params)?;
        let mut sql = format!("{keyword} {table}");

        if columns.is_empty() {
            sql.push_str(&returning.inline);
            sql.push_str(self.dialect.empty_insert());
            sql.push_str(&returning.trailing);
            return Ok(sql);
        }

        let escaped = columns
            .iter()
            .map(|c| self.insert_column(c))
            .collect::<SqlResult<Vec<_>>>()?;
        sql.push_str(&format!(" ({})", escaped.join(", ")));
        sql.push_str(&returning.inline);

        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            let mut values = Vec::with_capacity(columns.len());
            for column in &columns {
                let arg = row.get(column).ok_or_else(|| {
                    SqlError::malformed(format!("INSERT row is missing column '{column}'"))
                })?;
                values.push(self.arg(arg, params)?);
            }
            tuples.push(values.join(", "));
        }

        if rows.len() > 1 && self.dialect.multi_row_insert_union() {
            let from = match self.dialect.dummy_table() {
                Some(dummy) => format!(" FROM {dummy}"),
                None => String::new(),
            };
            let selects = tuples
                .iter()
                .map(|t| format!("SELECT {t}{from}"))
                .collect::<Vec<_>>();
            sql.push(' ');
            sql.push_str(&selects.join(" UNION ALL "));
        } else {
            let tuples = tuples.iter().map(|t| format!("({t})")).collect::<Vec<_>>();
            sql.push_str(" VALUES ");
            sql.push_str(&tuples.join(", "));
        }
        sql.push_str(&returning.trailing);
        Ok(sql)
    }

    /// Column in an INSERT column list: plain dotted name only.
    fn insert_column(&self, name: &str) -> SqlResult<String> {
        let ident = Ident::parse(name)?;
        if ident.is_json() || ident.alias.is_some() {
            return Err(SqlError::malformed(format!(
                "INSERT column '{name}' must be a plain column name"
            )));
        }
        Ok(self.escape_segments(&ident.segments))
    }

    /// Group assignments into slots, keeping first-seen order.
    fn slots<'r>(&self, values: &'r Record) -> SqlResult<Vec<Slot<'r>>> {
        let mut slots: Vec<Slot<'r>> = Vec::with_capacity(values.len());
        for (column, arg) in values.iter() {
            let ident = Ident::parse(column)?;
            if ident.alias.is_some() || ident.is_wildcard() {
                return Err(SqlError::malformed(format!(
                    "cannot assign to '{column}'"
                )));
            }
            if !ident.is_json() {
                slots.push(Slot::Plain {
                    segments: ident.segments,
                    arg,
                });
                continue;
            }
            let existing = slots.iter_mut().find_map(|slot| match slot {
                Slot::Json { segments, sets } if *segments == ident.segments => Some(sets),
                _ => None,
            });
            match existing {
                Some(sets) => sets.push((ident.json_path, arg)),
                None => slots.push(Slot::Json {
                    segments: ident.segments,
                    sets: vec![(ident.json_path, arg)],
                }),
            }
        }
        Ok(slots)
    }

    /// `a = ?, data = json_set(json_set(data, p1, ?), p2, ?)`
    pub(crate) fn assignments(&self, values: &Record, params: &mut ParamList) -> SqlResult<String> {
        let slots = self.slots(values)?;
        let mut parts = Vec::with_capacity(slots.len());
        for slot in &slots {
            match slot {
                Slot::Plain { segments, arg } => {
                    let column = self.escape_segments(segments);
                    parts.push(format!("{column} = {}", self.arg(arg, params)?));
                }
                Slot::Json { segments, sets } => {
                    let json = self.require(self.dialect.json(), "JSON path assignment")?;
                    let column = self.escape_segments(segments);
                    let mut expression = column.clone();
                    for (path, arg) in sets {
                        let value = match arg {
                            Arg::Value(v) => params.bind(json.json_value(v.clone())).to_string(),
                            Arg::Raw(raw) => self.raw(raw, params)?,
                        };
                        expression = json.json_set(&expression, path, &value);
                    }
                    parts.push(format!("{column} = {expression}"));
                }
            }
        }
        Ok(parts.join(", "))
    }

    pub(crate) fn compile_update(
        &self,
        query: &Query,
        values: &Record,
        returning: &[&str],
        params: &mut ParamList,
    ) -> SqlResult<String> {
        query.validate()?;
        if values.is_empty() {
            return Err(SqlError::malformed("UPDATE requires at least one column"));
        }
        if let TableRef::Subquery(_) = query.table_ref() {
            return Err(SqlError::malformed("UPDATE target cannot be a subquery"));
        }

        let returning = if returning.is_empty() {
            ReturningClause::default()
        } else {
            let hook = self.require(self.dialect.returning(), "RETURNING")?;
            if !hook.supports_update() {
                return Err(self.unsupported("RETURNING on UPDATE"));
            }
            self.returning_clause(hook, returning)?
        };

        let table = self.table_ref(query.table_ref(), params)?;
        let joins = self.joins(query.joins(), params)?;
        let assignments = self.assignments(values, params)?;
        let wheres = self.where_clause(query.wheres(), params)?;
        Ok(format!(
            "UPDATE {table}{joins} SET {assignments}{}{wheres}{}",
            returning.inline, returning.trailing
        ))
    }

    pub(crate) fn compile_delete(&self, query: &Query, params: &mut ParamList) -> SqlResult<String> {
        query.validate()?;
        let table = query.table_ref();
        let multi = matches!(table, TableRef::Names(_)) || !query.joins().is_empty();
        if !multi {
            if let TableRef::Subquery(_) = table {
                return Err(SqlError::malformed("DELETE target cannot be a subquery"));
            }
            let table = self.table_ref(table, params)?;
            let wheres = self.where_clause(query.wheres(), params)?;
            return Ok(format!("DELETE FROM {table}{wheres}"));
        }

        let names: Vec<&str> = match table {
            TableRef::Name(name) => vec![name.as_str()],
            TableRef::Names(names) => names.iter().map(String::as_str).collect(),
            _ => {
                return Err(SqlError::malformed(
                    "DELETE with joins requires named target tables",
                ));
            }
        };
        let targets = names
            .iter()
            .map(|name| {
                let ident = Ident::parse(name)?;
                Ok(match ident.alias {
                    Some(alias) => self.dialect.escape_identifier(alias),
                    None => self.escape_segments(&ident.segments),
                })
            })
            .collect::<SqlResult<Vec<_>>>()?;
        let tables = self.table_ref(table, params)?;
        let joins = self.joins(query.joins(), params)?;
        let wheres = self.where_clause(query.wheres(), params)?;
        Ok(format!(
            "DELETE {} FROM {tables}{joins}{wheres}",
            targets.join(", ")
        ))
    }

    pub(crate) fn compile_upsert(
        &self,
        query: &Query,
        insert: &Record,
        update: &Record,
        conflict_target: &[&str],
        params: &mut ParamList,
    ) -> SqlResult<String> {
        let upsert = self.require(self.dialect.upsert(), "upsert")?;
        let keyword = upsert.insert_keyword(!update.is_empty());
        let mut sql = self.compile_insert(query, std::slice::from_ref(insert), &[], keyword, params)?;
        let assignments = self.assignments(update, params)?;
        let conflict = conflict_target
            .iter()
            .map(|c| self.insert_column(c))
            .collect::<SqlResult<Vec<_>>>()?;
        sql.push_str(&upsert.upsert_clause(&conflict, &assignments)?);
        Ok(sql)
    }
}
