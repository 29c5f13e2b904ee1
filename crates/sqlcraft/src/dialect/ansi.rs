//! ANSI baseline.

use super::{Dialect, IdentifierQuoting, Locking, RowLimiting};

/// Portable baseline: `"` quoting, `LIMIT`/`OFFSET`, no optional capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi;

impl IdentifierQuoting for Ansi {}

impl RowLimiting for Ansi {}

impl Locking for Ansi {}

impl Dialect for Ansi {
    fn name(&self) -> &'static str {
        "ANSI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Lock;

    #[test]
    fn baseline_hooks() {
        assert_eq!(Ansi.limit_offset(Some(10), Some(20), false), " LIMIT 10 OFFSET 20");
        assert_eq!(Ansi.lock_clause(&Lock::Exclusive), "");
        assert_eq!(Ansi.lock_clause(&Lock::Custom("FOR UPDATE NOWAIT".into())), " FOR UPDATE NOWAIT");
        assert!(Ansi.dates().is_none());
        assert!(Ansi.json().is_none());
        assert!(Ansi.returning().is_none());
        assert!(Ansi.upsert().is_none());
        assert!(Ansi.vectors().is_none());
    }
}
