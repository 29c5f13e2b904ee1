//! Error types for sqlcraft

use thiserror::Error;

/// Result type alias for compile operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while building or compiling a query.
///
/// Compilation is all-or-nothing: when any of these is returned no SQL was
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// The dialect has no rendering for the requested feature.
    #[error("{dialect} does not support {feature}")]
    Unsupported {
        dialect: &'static str,
        feature: &'static str,
    },

    /// Structurally invalid query input.
    #[error("Malformed query: {0}")]
    Malformed(String),
}

impl SqlError {
    /// Create a capability-not-supported error.
    pub fn unsupported(dialect: &'static str, feature: &'static str) -> Self {
        Self::Unsupported { dialect, feature }
    }

    /// Create a malformed-input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Check if this is a capability-not-supported error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Check if this is a malformed-input error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}
