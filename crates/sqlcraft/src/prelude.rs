//! Convenient imports for typical `sqlcraft` usage.
//!
//! ```ignore
//! use sqlcraft::prelude::*;
//! ```

pub use crate::dialect::{
    Ansi, Db2, Dialect, Firebird, MariaDb, MySql, NuoDb, Oracle, Postgres, SqlServer, Sqlite,
};
pub use crate::{
    Arg, Compiled, Compiler, CompilerConfig, Direction, Join, JoinKind, Lock, Query, Raw, Record,
    SqlError, SqlResult, Subquery, Value, VectorMetric, raw,
};
