//! # sqlcraft
//!
//! A multi-dialect SQL query builder and compiler.
//!
//! ## Features
//!
//! - **Dialect-agnostic builder**: one [`Query`] compiles to MySQL, MariaDB, PostgreSQL,
//!   SQLite, SQL Server, Oracle, Firebird, DB2 and NuoDB
//! - **Always parameterized**: values become `?` placeholders; only identifiers are
//!   escaped into the SQL text
//! - **Capability checks**: features a dialect lacks (upsert, RETURNING, JSON paths,
//!   date comparisons, vector search) fail with [`SqlError::Unsupported`]
//! - **No I/O**: compiling is a pure `Query -> (sql, params)` transformation
//!
//! ## Example
//!
//! ```ignore
//! use sqlcraft::prelude::*;
//!
//! let query = Query::table("users")
//!     .select(["id", "name"])
//!     .gt("age", 18)
//!     .or_where_group(|q| q.eq("role", "admin").is_not_null("verified_at"))
//!     .order_by_desc("created_at")
//!     .limit(10)
//!     .offset(20);
//!
//! let compiled = Compiler::new(&SqlServer).select(&query)?;
//! // SELECT [id], [name] FROM [users] WHERE [age] > ? OR ([role] = ? AND [verified_at] IS NOT NULL)
//! //   ORDER BY [created_at] DESC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY
//!
//! let insert = Compiler::new(&Sqlite).insert_and_return(
//!     &Query::table("t"),
//!     &Record::new().set("x", 1),
//!     &["id"],
//! )?;
//! assert_eq!(insert.sql, r#"INSERT INTO "t" ("x") VALUES (?) RETURNING "id""#);
//! ```

pub mod compiler;
pub mod config;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod prelude;
pub mod query;
pub mod value;

pub use compiler::{Compiled, Compiler, ParamList, StatementKind};
pub use config::CompilerConfig;
pub use dialect::Dialect;
pub use error::{SqlError, SqlResult};
pub use ident::Ident;
pub use query::{
    Arg, ColumnRef, Condition, Direction, InValues, Join, JoinKind, Lock, Operator, Query, Raw,
    Record, Separator, SetOperator, Subquery, TableRef, VectorMetric, raw,
};
pub use value::Value;
