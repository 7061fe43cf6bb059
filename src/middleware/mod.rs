//! # Middleware Module
//!
//! The chain executor. A chain is an ordered, shared slice of [`Middleware`];
//! each link receives the request and a [`Next`] continuation and either
//! answers or calls `next.run(request)`. Running past the last link yields the
//! fallback response (the router uses an empty 404).
//!
//! Every route is projected into a [`RouteMiddleware`], which is what makes
//! registration order the match order: a route that does not match simply
//! delegates to the one registered after it.
//!
//! ```rust
//! use std::sync::Arc;
//! use routechain::middleware::{chain, Middleware, MiddlewareChain, Next};
//! use routechain::{response, Request};
//! use http::StatusCode;
//!
//! # futures::executor::block_on(async {
//! let pass = |req: Request, next: Next| next.run(req);
//! let answer = |_req: Request, _next: Next| async {
//!     Ok::<_, anyhow::Error>(response::text(StatusCode::OK, "hi"))
//! };
//! let links: Vec<Arc<dyn Middleware>> = vec![Arc::new(pass), Arc::new(answer)];
//! let links: MiddlewareChain = links.into();
//!
//! let res = chain(Request::new(Default::default()), response::not_found(), links)
//!     .await
//!     .unwrap();
//! assert_eq!(res.status(), StatusCode::OK);
//! # });
//! ```

mod core;
mod route;
#[cfg(test)]
mod tests;

pub use self::core::{chain, Middleware, MiddlewareChain, Next};
pub use self::route::{request_url, RouteMiddleware};
