//! Per-handler purge declarations.
//!
//! Handlers declare at registration time which cached queries and which
//! entity type their successful responses invalidate. The interceptor reads
//! the declarations back after each successful call.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Identity of a registered handler (route name, resolver field, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(Cow<'static, str>);

impl HandlerId {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for HandlerId {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for HandlerId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Entity-type invalidation declared on a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeTypeDeclaration {
    /// Entity type name, e.g. `post`.
    pub type_name: String,
    /// Key in the response payload holding the id that scopes the purge.
    pub id_reference: Option<String>,
}

/// Mapping from handler identity to its purge declarations.
///
/// Populated during setup, then shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PurgeRegistry {
    queries: HashMap<HandlerId, Vec<String>>,
    types: HashMap<HandlerId, PurgeTypeDeclaration>,
}

impl PurgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the cached queries a handler invalidates, replacing any earlier list.
    pub fn declare_queries<I, S>(&mut self, handler: impl Into<HandlerId>, queries: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queries = queries.into_iter().map(Into::into).collect();
        self.queries.insert(handler.into(), queries);
        self
    }

    /// Declare the entity type a handler invalidates, replacing any earlier declaration.
    pub fn declare_type(
        &mut self, handler: impl Into<HandlerId>, type_name: impl Into<String>, id_reference: Option<&str>,
    ) -> &mut Self {
        let declaration =
            PurgeTypeDeclaration { type_name: type_name.into(), id_reference: id_reference.map(str::to_string) };
        self.types.insert(handler.into(), declaration);
        self
    }

    pub fn lookup_queries(&self, handler: &HandlerId) -> Option<&[String]> {
        self.queries.get(handler).map(Vec::as_slice)
    }

    pub fn lookup_type(&self, handler: &HandlerId) -> Option<&PurgeTypeDeclaration> {
        self.types.get(handler)
    }

    /// Number of distinct handlers carrying at least one declaration.
    pub fn len(&self) -> usize {
        self.queries
            .keys()
            .chain(self.types.keys().filter(|k| !self.queries.contains_key(*k)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty() && self.types.is_empty()
    }
}
