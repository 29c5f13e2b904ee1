//! SQL identifier parsing.
//!
//! A column or table name given to the builder may carry, in this order:
//!
//! - dotted qualification: `schema.table.column`
//! - a JSON path after the base column: `data->address->city`
//! - an alias: `users AS u` (the ` AS ` keyword is matched case-insensitively)
//!
//! [`Ident::parse`] splits a name into these parts; the compiler escapes each
//! segment with the dialect's quote character. `*` is never quoted.

use crate::error::{SqlError, SqlResult};

/// Separator between a column and its JSON path segments.
pub const JSON_PATH_SEPARATOR: &str = "->";

/// A parsed identifier reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident<'a> {
    /// Dotted segments, e.g. `["public", "users"]`.
    pub segments: Vec<&'a str>,
    /// JSON path below the base column, e.g. `["address", "city"]`.
    pub json_path: Vec<&'a str>,
    /// Alias following ` AS `.
    pub alias: Option<&'a str>,
}

impl<'a> Ident<'a> {
    /// Parse an identifier string.
    pub fn parse(name: &'a str) -> SqlResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SqlError::malformed("identifier cannot be empty"));
        }
        if name.contains('\0') {
            return Err(SqlError::malformed("identifier cannot contain NUL character"));
        }

        let (base, alias) = split_alias(name);
        if let Some(alias) = alias {
            if alias.is_empty() {
                return Err(SqlError::malformed(format!("empty alias in '{name}'")));
            }
        }

        let mut path = base.split(JSON_PATH_SEPARATOR).map(str::trim);
        // `split` always yields at least one item.
        let column = path.next().unwrap_or_default();
        let json_path: Vec<&str> = path.collect();
        if json_path.iter().any(|p| p.is_empty()) {
            return Err(SqlError::malformed(format!("empty JSON path segment in '{name}'")));
        }

        let segments: Vec<&str> = column.split('.').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(SqlError::malformed(format!("empty identifier segment in '{name}'")));
        }
        if !json_path.is_empty() && segments.last() == Some(&"*") {
            return Err(SqlError::malformed(format!("JSON path on wildcard in '{name}'")));
        }

        Ok(Self {
            segments,
            json_path,
            alias,
        })
    }

    /// Whether the name carries a JSON path.
    pub fn is_json(&self) -> bool {
        !self.json_path.is_empty()
    }

    /// Whether the last segment is the `*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.segments.last() == Some(&"*")
    }
}

/// Split `base AS alias` into its two halves.
pub fn split_alias(name: &str) -> (&str, Option<&str>) {
    // ASCII lowercasing keeps byte offsets stable.
    let lower = name.to_ascii_lowercase();
    match lower.find(" as ") {
        Some(idx) => (name[..idx].trim(), Some(name[idx + 4..].trim())),
        None => (name, None),
    }
}

/// Whether a JSON path segment addresses an array element.
pub fn is_array_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
