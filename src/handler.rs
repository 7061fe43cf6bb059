//! # Handler Module
//!
//! A handler is what a route runs once its method and pattern have matched.
//! It receives the request, the [`RouteContext`] built from the match, and the
//! [`Next`] continuation for the rest of the chain. It either answers with a
//! response or hands the request on with `next.run(request)`.
//!
//! Async closures implement [`Handler`] directly:
//!
//! ```rust
//! use routechain::{handler::RouteContext, middleware::Next, response, Request};
//! use http::StatusCode;
//!
//! let _get_pet = |_req: Request, ctx: RouteContext, _next: Next| async move {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     Ok::<_, anyhow::Error>(response::text(StatusCode::OK, id))
//! };
//! ```
//!
//! Synchronous code goes through [`sync_handler`]; returning `Ok(None)`
//! delegates to the next route.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::RouterError;
use crate::middleware::Next;
use crate::pattern::MatchResult;
use crate::{Request, Response};

/// Outcome of a handler or middleware
pub type HandlerResult = anyhow::Result<Response>;

/// Per-dispatch match data handed to a route's handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    /// Pathname groups of the match (`/:id` → `{"id": "100"}`)
    pub params: HashMap<String, String>,
    /// The full pattern match, including protocol and hostname groups
    pub match_result: MatchResult,
}

impl RouteContext {
    #[must_use]
    pub fn from_match(match_result: MatchResult) -> Self {
        Self {
            params: match_result.pathname.groups.clone(),
            match_result,
        }
    }

    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Route handler
pub trait Handler: Send + Sync + 'static {
    fn call(
        &self,
        request: Request,
        context: RouteContext,
        next: Next,
    ) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, RouteContext, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(
        &self,
        request: Request,
        context: RouteContext,
        next: Next,
    ) -> BoxFuture<'static, HandlerResult> {
        self(request, context, next).boxed()
    }
}

/// Wrap a synchronous function as a [`Handler`]
///
/// `Ok(Some(response))` answers the request, `Ok(None)` passes it to the next
/// route, `Err` fails the dispatch.
pub fn sync_handler<F>(f: F) -> impl Handler
where
    F: Fn(&Request, &RouteContext) -> anyhow::Result<Option<Response>> + Send + Sync + 'static,
{
    move |request: Request, context: RouteContext, next: Next| -> BoxFuture<'static, HandlerResult> {
        match f(&request, &context) {
            Ok(Some(response)) => futures::future::ready(Ok(response)).boxed(),
            Ok(None) => next.run(request),
            Err(e) => futures::future::ready(Err(e)).boxed(),
        }
    }
}

/// Handlers addressable by name, for route tables
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, handler: impl Handler) -> &mut Self {
        self.register_shared(name, Arc::new(handler))
    }

    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> &mut Self {
        let name = name.into();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::warn!(handler_name = %name, "Replaced existing handler");
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(name).map(Arc::clone)
    }

    /// Look up `name`
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidHandler`] when nothing is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Handler>, RouterError> {
        self.get(name).ok_or_else(|| RouterError::InvalidHandler {
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &names)
            .finish()
    }
}
