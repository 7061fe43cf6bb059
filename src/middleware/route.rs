use futures::future::BoxFuture;
use http::header::HOST;
use tracing::{debug, trace};

use super::{Middleware, Next};
use crate::handler::{HandlerResult, RouteContext};
use crate::route::{matches_method, RouteEntry};
use crate::Request;

/// Match-or-delegate adaptor for one [`RouteEntry`]
///
/// 1. method not allowed → `next.run(request)`
/// 2. pattern does not match → `next.run(request)`
/// 3. otherwise the handler runs with a fresh [`RouteContext`]
pub struct RouteMiddleware {
    entry: RouteEntry,
}

impl RouteMiddleware {
    #[must_use]
    pub fn new(entry: RouteEntry) -> Self {
        Self { entry }
    }

    #[must_use]
    pub fn entry(&self) -> &RouteEntry {
        &self.entry
    }
}

impl Middleware for RouteMiddleware {
    fn handle(&self, request: Request, next: Next) -> BoxFuture<'static, HandlerResult> {
        if !matches_method(self.entry.methods(), request.method()) {
            trace!(route = %self.entry, method = %request.method(), "Method not allowed, skipping route");
            return next.run(request);
        }

        let url = request_url(&request);
        let Some(result) = self.entry.pattern().exec(&url) else {
            trace!(route = %self.entry, url = %url, "Pattern did not match, skipping route");
            return next.run(request);
        };

        let context = RouteContext::from_match(result);
        debug!(route = %self.entry, params = ?context.params, "Route matched");
        self.entry.handler().call(request, context, next)
    }
}

/// Absolute URL for pattern matching
///
/// Absolute-form request targets are used as-is. Origin-form targets
/// (`/pets/1`) are rebuilt as `http://{Host}{path?query}`, with `localhost`
/// standing in for a missing or unreadable `Host` header.
#[must_use]
pub fn request_url(request: &Request) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    format!("http://{host}{path}")
}
