use std::fmt;
use std::sync::Arc;

use http::Method;
use once_cell::sync::OnceCell;
use tracing::{debug, debug_span, Instrument};

use crate::config::RouterOptions;
use crate::error::RouterError;
use crate::handler::{Handler, HandlerResult};
use crate::ids::RequestId;
use crate::middleware::{chain, Middleware, MiddlewareChain};
use crate::path::concat_path;
use crate::pattern::UrlPattern;
use crate::registry::Registry;
use crate::route::{MethodSet, RouteEntry, RoutePath};
use crate::{response, Request, Response};

/// Anything that can hand over an ordered list of resolved routes
///
/// [`Router::use_router`] accepts any `RouterLike`, so a plain
/// `Vec<RouteEntry>` composes the same way a [`Router`] does.
pub trait RouterLike {
    /// Resolved entries, base prefix applied
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if a prefixed pattern does not compile.
    fn routes(&self) -> Result<Vec<RouteEntry>, RouterError>;
}

impl RouterLike for Vec<RouteEntry> {
    fn routes(&self) -> Result<Vec<RouteEntry>, RouterError> {
        Ok(self.clone())
    }
}

impl RouterLike for Registry {
    fn routes(&self) -> Result<Vec<RouteEntry>, RouterError> {
        self.entries(None)
    }
}

/// Ordered, fallthrough request router
///
/// Routes are tried in registration order. The first route whose method set
/// and pattern accept the request runs its handler; the handler either
/// answers or calls `next.run(request)` to continue with the routes after it.
/// A request nothing answers resolves to an empty 404.
///
/// Registration takes `&mut self`, dispatch takes `&self`: build the router,
/// then share it (for example behind an `Arc`) across tasks.
#[derive(Clone, Default)]
pub struct Router {
    registry: Registry,
    base: Option<String>,
    chain: OnceCell<MiddlewareChain>,
}

macro_rules! method_routes {
    ($($(#[$doc:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// [`RouterError::InvalidPattern`] if `path` does not compile.
            pub fn $name(
                &mut self,
                path: impl Into<RoutePath>,
                handler: impl Handler,
            ) -> Result<&mut Self, RouterError> {
                self.route([Method::$method], path, handler)
            }
        )*
    };
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Router whose routes are all read under `base`
    ///
    /// An empty base is the same as no base.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if `base` is not a valid pathname.
    pub fn with_base(base: impl Into<String>) -> Result<Self, RouterError> {
        let base = base.into();
        if base.is_empty() {
            return Ok(Self::new());
        }
        UrlPattern::parse(&concat_path(&base, "")).map_err(|e| match e {
            RouterError::InvalidPattern { reason, .. } => RouterError::InvalidPattern {
                pattern: base.clone(),
                reason,
            },
            other => other,
        })?;
        debug!(base = %base, "Created router with base");
        Ok(Self {
            base: Some(base),
            ..Self::default()
        })
    }

    /// # Errors
    ///
    /// See [`Router::with_base`].
    pub fn with_options(options: RouterOptions) -> Result<Self, RouterError> {
        match options.base {
            Some(base) => Self::with_base(base),
            None => Ok(Self::new()),
        }
    }

    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Register `handler` for `methods` (empty = every method) at `path`
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if `path` does not compile; nothing is
    /// registered.
    pub fn route(
        &mut self,
        methods: impl IntoIterator<Item = Method>,
        path: impl Into<RoutePath>,
        handler: impl Handler,
    ) -> Result<&mut Self, RouterError> {
        self.route_shared(methods, path, Arc::new(handler))
    }

    /// [`Router::route`] for a handler that is already shared
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if `path` does not compile.
    pub fn route_shared(
        &mut self,
        methods: impl IntoIterator<Item = Method>,
        path: impl Into<RoutePath>,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, RouterError> {
        self.registry.register(methods, path.into(), handler)?;
        self.invalidate();
        Ok(self)
    }

    method_routes! {
        /// Register a `GET` route
        get => GET;
        /// Register a `HEAD` route
        head => HEAD;
        /// Register a `POST` route
        post => POST;
        /// Register a `PUT` route
        put => PUT;
        /// Register a `DELETE` route
        delete => DELETE;
        /// Register a `PATCH` route
        patch => PATCH;
        /// Register an `OPTIONS` route
        options => OPTIONS;
        /// Register a `TRACE` route
        trace => TRACE;
        /// Register a `CONNECT` route
        connect => CONNECT;
    }

    /// Register a route matching every method
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if `path` does not compile.
    pub fn all(
        &mut self,
        path: impl Into<RoutePath>,
        handler: impl Handler,
    ) -> Result<&mut Self, RouterError> {
        self.route(MethodSet::new(), path, handler)
    }

    /// Append the resolved routes of `other`
    ///
    /// The routes are copied in their current state; later changes to `other`
    /// are not seen by this router.
    ///
    /// # Errors
    ///
    /// Any error from `other.routes()`; nothing is appended.
    pub fn use_router<R>(&mut self, other: &R) -> Result<&mut Self, RouterError>
    where
        R: RouterLike + ?Sized,
    {
        self.use_routers([other])
    }

    /// Append the resolved routes of each router in order
    ///
    /// # Errors
    ///
    /// Any error from a router's `routes()`; nothing is appended.
    pub fn use_routers<'a, R, I>(&mut self, routers: I) -> Result<&mut Self, RouterError>
    where
        R: RouterLike + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut staged = Registry::new();
        for router in routers {
            staged.merge(router)?;
        }
        staged.append_to(&mut self.registry);
        self.invalidate();
        Ok(self)
    }

    /// Registered routes with this router's base applied
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if a prefixed pattern does not compile.
    pub fn routes(&self) -> Result<Vec<RouteEntry>, RouterError> {
        self.registry.entries(self.base.as_deref())
    }

    /// The projected middleware chain, one link per route
    ///
    /// Built on first use and cached until the next registration.
    ///
    /// # Errors
    ///
    /// See [`Router::routes`].
    pub fn middleware(&self) -> Result<MiddlewareChain, RouterError> {
        self.chain
            .get_or_try_init(|| {
                let links: Vec<Arc<dyn Middleware>> = self
                    .routes()?
                    .into_iter()
                    .map(RouteEntry::into_middleware)
                    .collect();
                debug!(routes = links.len(), base = ?self.base, "Built middleware chain");
                Ok(links.into())
            })
            .map(Arc::clone)
    }

    /// Dispatch `request`, resolving to an empty 404 when no route answers
    ///
    /// # Errors
    ///
    /// Handler errors, unchanged.
    pub async fn handle(&self, request: Request) -> HandlerResult {
        self.handle_with_fallback(request, response::not_found())
            .await
    }

    /// Dispatch `request`, resolving to `fallback` when no route answers
    ///
    /// # Errors
    ///
    /// Handler errors, unchanged.
    pub async fn handle_with_fallback(&self, request: Request, fallback: Response) -> HandlerResult {
        let span = debug_span!(
            "dispatch",
            request_id = %RequestId::for_request(&request),
            method = %request.method(),
            path = %request.uri().path(),
        );
        let middleware = self.middleware()?;
        chain(request, fallback, middleware).instrument(span).await
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn invalidate(&mut self) {
        self.chain = OnceCell::new();
    }
}

impl RouterLike for Router {
    fn routes(&self) -> Result<Vec<RouteEntry>, RouterError> {
        Router::routes(self)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("base", &self.base)
            .field("routes", &self.registry.len())
            .field("chain_cached", &self.chain.get().is_some())
            .finish()
    }
}
