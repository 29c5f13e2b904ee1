//! Column/value lists for INSERT, UPDATE and upsert statements.

use super::raw::Raw;
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// A value position: either a bound value or a caller-asserted-safe fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    Raw(Raw),
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<Raw> for Arg {
    fn from(r: Raw) -> Self {
        Arg::Raw(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Value(v.into())
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_arg_from!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    &String,
    Vec<u8>,
    &[u8],
    serde_json::Value,
    NaiveDate,
    NaiveDateTime,
    Uuid,
    Vec<f32>,
);

/// An ordered list of `column => value` assignments.
///
/// # Example
/// ```ignore
/// let row = Record::new().set("name", "alice").set("age", 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Arg)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column assignment.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.entries.push((column.into(), value.into()));
        self
    }

    /// Append a column assignment if the value is present.
    pub fn set_opt<V: Into<Arg>>(self, column: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Append a column assigned from a raw expression.
    pub fn set_raw(self, column: impl Into<String>, expr: Raw) -> Self {
        self.set(column, Arg::Raw(expr))
    }

    pub fn get(&self, column: &str) -> Option<&Arg> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
