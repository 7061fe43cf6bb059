//! Ordered route storage.
//!
//! Insertion order is match priority: the first entry whose method and
//! pattern accept a request gets it, and a handler that delegates hands it to
//! the entry stored after it. Base prefixes are never written into stored
//! entries; [`Registry::entries`] applies them on read.

use std::sync::Arc;

use http::Method;
use tracing::debug;

use crate::error::RouterError;
use crate::handler::Handler;
use crate::pattern::UrlPattern;
use crate::route::{RouteEntry, RoutePath};
use crate::router::RouterLike;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RouteEntry>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `path` and append a new entry
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if the pattern does not compile; the
    /// registry is left unchanged.
    pub fn register(
        &mut self,
        methods: impl IntoIterator<Item = Method>,
        path: RoutePath,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RouterError> {
        let pattern = UrlPattern::new(path.into_init())?;
        let entry = RouteEntry::new(methods, pattern, handler);
        debug!(route = %entry, position = self.entries.len(), "Registered route");
        self.entries.push(entry);
        Ok(())
    }

    /// Append `entries` in order
    pub fn extend(&mut self, entries: impl IntoIterator<Item = RouteEntry>) {
        let before = self.entries.len();
        self.entries.extend(entries);
        debug!(
            added = self.entries.len() - before,
            total = self.entries.len(),
            "Merged routes"
        );
    }

    /// Append the resolved entries of `other`, its own base already applied
    ///
    /// # Errors
    ///
    /// Any error from `other.routes()`; nothing is appended in that case.
    pub fn merge<R>(&mut self, other: &R) -> Result<(), RouterError>
    where
        R: RouterLike + ?Sized,
    {
        let entries = other.routes()?;
        self.extend(entries);
        Ok(())
    }

    /// Move every stored entry into `other`, keeping order
    pub(crate) fn append_to(self, other: &mut Registry) {
        other.extend(self.entries);
    }

    /// Stored entries with `base` prepended to every pathname
    ///
    /// `None` or an empty base returns clones of the stored entries.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if a joined pathname does not compile.
    pub fn entries(&self, base: Option<&str>) -> Result<Vec<RouteEntry>, RouterError> {
        match base.filter(|b| !b.is_empty()) {
            None => Ok(self.entries.clone()),
            Some(base) => self.entries.iter().map(|e| e.with_base(base)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
