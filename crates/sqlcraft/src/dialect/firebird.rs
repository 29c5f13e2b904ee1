//! Firebird.

use super::{DateComparison, Dialect, IdentifierQuoting, Locking, Returning, RowLimiting};
use crate::query::Lock;

/// Upper bound of a `ROWS m TO n` range when only an offset is given.
const MAX_ROWS: u64 = i32::MAX as u64;

/// Firebird 3+.
#[derive(Debug, Clone, Copy, Default)]
pub struct Firebird;

impl IdentifierQuoting for Firebird {}

/// `ROWS` counts from 1 and both bounds are inclusive.
impl RowLimiting for Firebird {
    fn limit_offset(&self, limit: Option<u32>, offset: Option<u32>, _ordered: bool) -> String {
        match (limit, offset) {
            (Some(n), None) => format!(" ROWS {n}"),
            (Some(n), Some(m)) => {
                let first = u64::from(m) + 1;
                format!(" ROWS {first} TO {}", u64::from(m) + u64::from(n))
            }
            (None, Some(m)) => format!(" ROWS {} TO {MAX_ROWS}", u64::from(m) + 1),
            (None, None) => String::new(),
        }
    }
}

impl Locking for Firebird {
    fn lock_clause(&self, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive | Lock::Shared => " WITH LOCK".to_string(),
            Lock::Custom(clause) => format!(" {clause}"),
        }
    }
}

impl DateComparison for Firebird {
    fn date_expression(&self, column: &str) -> String {
        format!("CAST({column} AS DATE)")
    }
}

impl Returning for Firebird {}

impl Dialect for Firebird {
    fn name(&self) -> &'static str {
        "Firebird"
    }

    fn dummy_table(&self) -> Option<&'static str> {
        Some("RDB$DATABASE")
    }

    fn multi_row_insert_union(&self) -> bool {
        true
    }

    fn dates(&self) -> Option<&dyn DateComparison> {
        Some(self)
    }

    fn returning(&self) -> Option<&dyn Returning> {
        Some(self)
    }
}
