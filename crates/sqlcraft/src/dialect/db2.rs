//! IBM DB2.

use super::{DateComparison, Dialect, IdentifierQuoting, Locking, RowLimiting};
use crate::query::Lock;

/// IBM DB2 for LUW.
///
/// Offsets are emulated with `ROW_NUMBER()` over the ordered statement.
/// [`Db2::legacy`] quotes identifiers with backticks for old deployments
/// that were configured that way.
#[derive(Debug, Clone, Copy, Default)]
pub struct Db2 {
    pub legacy: bool,
}

impl Db2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn legacy() -> Self {
        Self { legacy: true }
    }
}

impl IdentifierQuoting for Db2 {
    fn quote_chars(&self) -> (char, char) {
        if self.legacy { ('`', '`') } else { ('"', '"') }
    }
}

impl RowLimiting for Db2 {
    fn limit_offset(&self, limit: Option<u32>, _offset: Option<u32>, _ordered: bool) -> String {
        match limit {
            Some(n) => format!(" FETCH FIRST {n} ROWS ONLY"),
            None => String::new(),
        }
    }

    fn limit_select(&self, select: String, ordered: bool, limit: Option<u32>, offset: Option<u32>) -> String {
        // `FETCH FIRST 0 ROWS` is rejected; an empty row-number window is not.
        let offset = match (limit, offset) {
            (Some(0), None) => Some(0),
            _ => offset,
        };
        let Some(m) = offset else {
            return select + &self.limit_offset(limit, None, ordered);
        };
        let inner = self.escape_identifier("db2_inner");
        let rownum = self.escape_identifier("db2_rownum");
        let outer = self.escape_identifier("db2_outer");
        let first = u64::from(m) + 1;
        let range = match limit {
            Some(n) => format!("BETWEEN {first} AND {}", u64::from(m) + u64::from(n)),
            None => format!("> {m}"),
        };
        format!(
            "SELECT * FROM (SELECT {inner}.*, ROW_NUMBER() OVER () AS {rownum} FROM ({select}) AS {inner}) AS {outer} WHERE {rownum} {range}"
        )
    }
}

impl Locking for Db2 {
    fn lock_clause(&self, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive => " FOR UPDATE WITH RS USE AND KEEP EXCLUSIVE LOCKS".to_string(),
            Lock::Shared => " FOR READ ONLY WITH RS USE AND KEEP SHARE LOCKS".to_string(),
            Lock::Custom(clause) => format!(" {clause}"),
        }
    }
}

impl DateComparison for Db2 {
    fn date_expression(&self, column: &str) -> String {
        format!("CAST({column} AS DATE)")
    }

    fn expands_day_bounds(&self) -> bool {
        false
    }
}

impl Dialect for Db2 {
    fn name(&self) -> &'static str {
        "DB2"
    }

    fn dummy_table(&self) -> Option<&'static str> {
        Some("SYSIBM.SYSDUMMY1")
    }

    fn recursive_keyword(&self) -> &'static str {
        ""
    }

    fn dates(&self) -> Option<&dyn DateComparison> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_modes() {
        assert_eq!(Db2::new().escape_identifier("t"), "\"t\"");
        assert_eq!(Db2::legacy().escape_identifier("t"), "`t`");
    }

    #[test]
    fn limit_only_fetches_first() {
        assert_eq!(
            Db2::new().limit_select("SELECT * FROM \"t\"".into(), false, Some(5), None),
            "SELECT * FROM \"t\" FETCH FIRST 5 ROWS ONLY"
        );
    }

    #[test]
    fn offset_uses_row_number() {
        assert_eq!(
            Db2::new().limit_select("SELECT * FROM \"t\"".into(), false, Some(10), Some(20)),
            "SELECT * FROM (SELECT \"db2_inner\".*, ROW_NUMBER() OVER () AS \"db2_rownum\" \
             FROM (SELECT * FROM \"t\") AS \"db2_inner\") AS \"db2_outer\" \
             WHERE \"db2_rownum\" BETWEEN 21 AND 30"
        );
    }

    #[test]
    fn zero_limit_uses_empty_window() {
        assert_eq!(
            Db2::new().limit_select("SELECT * FROM \"t\"".into(), false, Some(0), None),
            "SELECT * FROM (SELECT \"db2_inner\".*, ROW_NUMBER() OVER () AS \"db2_rownum\" \
             FROM (SELECT * FROM \"t\") AS \"db2_inner\") AS \"db2_outer\" \
             WHERE \"db2_rownum\" BETWEEN 1 AND 0"
        );
    }
}
