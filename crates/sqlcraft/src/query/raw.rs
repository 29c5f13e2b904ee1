//! Opaque SQL fragments.

use crate::value::Value;

/// A verbatim SQL fragment with its own bound values.
///
/// The text is emitted as-is, so the caller asserts it is safe. Each `?` in
/// the fragment (outside quoted literals) must have a matching value in
/// `params`; the compiler checks this before splicing the values into the
/// surrounding parameter stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    sql: String,
    params: Vec<Value>,
}

impl Raw {
    /// Create a fragment without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create a fragment with `?` placeholders and their values.
    ///
    /// # Example
    /// ```ignore
    /// Raw::with_params("price * ? > ?", [1.2, 100.0])
    /// ```
    pub fn with_params<V: Into<Value>>(
        sql: impl Into<String>,
        params: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            sql: sql.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Bind one more value.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Shorthand for [`Raw::new`].
pub fn raw(sql: impl Into<String>) -> Raw {
    Raw::new(sql)
}
