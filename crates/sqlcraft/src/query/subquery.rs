//! Nested queries used as tables, IN sources, EXISTS operands, CTE bodies
//! and set-operation operands.

use super::Query;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A deferred builder that receives a fresh child query.
pub type BuilderFn = Arc<dyn Fn(Query) -> Query + Send + Sync>;

#[derive(Clone)]
enum Source {
    Query(Box<Query>),
    Builder(BuilderFn),
}

/// A nested query with an optional alias.
///
/// Either owns a concrete [`Query`] or a builder callback that is run against
/// a fresh child query each time the subquery is compiled.
#[derive(Clone)]
pub struct Subquery {
    source: Source,
    alias: Option<String>,
}

impl Subquery {
    /// Wrap a concrete query.
    pub fn new(query: Query) -> Self {
        Self {
            source: Source::Query(Box::new(query)),
            alias: None,
        }
    }

    /// Wrap a builder callback.
    ///
    /// # Example
    /// ```ignore
    /// let recent = Subquery::builder(|q| q.from("orders").gt("total", 100)).alias("big");
    /// ```
    pub fn builder<F>(f: F) -> Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        Self {
            source: Source::Builder(Arc::new(f)),
            alias: None,
        }
    }

    /// Set the alias used when the subquery is a derived table.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn get_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// True when the subquery is a callback rather than a concrete query.
    pub fn provides_builder_instance(&self) -> bool {
        matches!(self.source, Source::Builder(_))
    }

    /// The query to compile. Builder callbacks run against a fresh child.
    pub fn resolve(&self) -> Cow<'_, Query> {
        match &self.source {
            Source::Query(q) => Cow::Borrowed(q.as_ref()),
            Source::Builder(f) => Cow::Owned(f(Query::new())),
        }
    }
}

impl From<Query> for Subquery {
    fn from(query: Query) -> Self {
        Subquery::new(query)
    }
}

impl fmt::Debug for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Subquery");
        match &self.source {
            Source::Query(q) => s.field("query", q),
            Source::Builder(_) => s.field("query", &"<builder fn>"),
        };
        s.field("alias", &self.alias).finish()
    }
}
