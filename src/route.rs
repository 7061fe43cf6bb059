//! Route entries and method matching.

use std::fmt;
use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;

use crate::error::RouterError;
use crate::handler::Handler;
use crate::middleware::{Middleware, RouteMiddleware};
use crate::path::concat_path;
use crate::pattern::{PatternInit, UrlPattern};

/// Allowed methods of a route; empty means every method
pub type MethodSet = SmallVec<[Method; 2]>;

/// `true` when `allowed` is empty or contains `actual`
///
/// Comparison is exact-token. `http::Method` keeps extension tokens verbatim,
/// so a request method of `get` does not match an allowed `GET`.
#[inline]
#[must_use]
pub fn matches_method(allowed: &[Method], actual: &Method) -> bool {
    allowed.is_empty() || allowed.iter().any(|m| m == actual)
}

/// Path argument of a registration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePath {
    /// An explicit pattern (pathname, optionally host/protocol)
    Pattern(PatternInit),
    /// Every URL; stored as the pathname `*`
    Wildcard,
}

impl RoutePath {
    pub(crate) fn into_init(self) -> PatternInit {
        match self {
            RoutePath::Pattern(init) => init,
            RoutePath::Wildcard => PatternInit::pathname("*"),
        }
    }
}

impl From<&str> for RoutePath {
    fn from(pathname: &str) -> Self {
        RoutePath::Pattern(PatternInit::pathname(pathname))
    }
}

impl From<String> for RoutePath {
    fn from(pathname: String) -> Self {
        RoutePath::Pattern(PatternInit::pathname(pathname))
    }
}

impl From<PatternInit> for RoutePath {
    fn from(init: PatternInit) -> Self {
        RoutePath::Pattern(init)
    }
}

/// One registered route: methods, pattern and handler
///
/// Entries are values. Applying a base prefix builds a new entry that shares
/// the handler `Arc` and never touches the original.
#[derive(Clone)]
pub struct RouteEntry {
    methods: MethodSet,
    pattern: UrlPattern,
    handler: Arc<dyn Handler>,
}

impl RouteEntry {
    pub fn new(
        methods: impl IntoIterator<Item = Method>,
        pattern: UrlPattern,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            methods: methods.into_iter().collect(),
            pattern,
            handler,
        }
    }

    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    #[must_use]
    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Copy of this entry with `base` prepended to the pathname
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if the joined pathname does not compile.
    pub fn with_base(&self, base: &str) -> Result<Self, RouterError> {
        if base.is_empty() {
            return Ok(self.clone());
        }
        let pathname = concat_path(base, self.pattern.pathname());
        Ok(Self {
            methods: self.methods.clone(),
            pattern: self.pattern.with_pathname(&pathname)?,
            handler: Arc::clone(&self.handler),
        })
    }

    /// Project this entry into its match-or-delegate middleware
    #[must_use]
    pub fn into_middleware(self) -> Arc<dyn Middleware> {
        Arc::new(RouteMiddleware::new(self))
    }
}

impl PartialEq for RouteEntry {
    fn eq(&self, other: &Self) -> bool {
        // Handlers are compared by identity; the vtable half of the fat pointer is ignored
        let same_handler = std::ptr::eq(
            Arc::as_ptr(&self.handler) as *const (),
            Arc::as_ptr(&other.handler) as *const (),
        );
        self.methods == other.methods && self.pattern == other.pattern && same_handler
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("methods", &self.methods)
            .field("pattern", &self.pattern.to_string())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.methods.is_empty() {
            write!(f, "*")?;
        } else {
            let methods: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
            write!(f, "{}", methods.join(","))?;
        }
        write!(f, " {}", self.pattern)
    }
}
