//! NuoDB.

use super::{DateComparison, Dialect, IdentifierQuoting, Locking, RowLimiting};
use crate::query::Lock;

#[derive(Debug, Clone, Copy, Default)]
pub struct NuoDb;

impl IdentifierQuoting for NuoDb {
    fn quote_chars(&self) -> (char, char) {
        ('`', '`')
    }
}

impl RowLimiting for NuoDb {}

impl Locking for NuoDb {
    fn lock_clause(&self, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive => " FOR UPDATE".to_string(),
            Lock::Shared => String::new(),
            Lock::Custom(clause) => format!(" {clause}"),
        }
    }
}

impl DateComparison for NuoDb {
    fn date_expression(&self, column: &str) -> String {
        format!("CAST({column} AS DATE)")
    }

    fn expands_day_bounds(&self) -> bool {
        false
    }
}

impl Dialect for NuoDb {
    fn name(&self) -> &'static str {
        "NuoDB"
    }

    fn dates(&self) -> Option<&dyn DateComparison> {
        Some(self)
    }
}
