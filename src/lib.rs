//! # routechain
//!
//! **routechain** is an ordered, fallthrough HTTP request router. Routes pair a
//! method set with a URL pattern and an async handler; a request is offered to
//! each route in registration order, and a handler may answer it or pass it on
//! to the routes after it with `next.run(request)`.
//!
//! ## Overview
//!
//! Most routers pick one winner per request. routechain treats the route list
//! as a middleware chain instead: every route becomes a link that either
//! skips (wrong method, pattern does not match), answers, or delegates. That
//! makes a few patterns natural:
//!
//! - a catch-all registered first that logs or decorates, then delegates
//! - several handlers for the same path that each decide whether to answer
//! - sub-routers mounted under a base path and reused under several prefixes
//!
//! ## Architecture
//!
//! - **[`pattern`]** - URL pattern compilation and matching (`/pets/:id`, `*`, host constraints)
//! - **[`route`]** - Route entries and method matching
//! - **[`registry`]** - Ordered route storage with lazily applied base prefixes
//! - **[`middleware`]** - The chain executor and the per-route match-or-delegate adaptor
//! - **[`router`]** - The builder and dispatch facade
//! - **[`handler`]** - The handler trait, route context and named handler registry
//! - **[`table`]** - Declarative YAML/JSON route tables
//! - **[`config`]**, **[`logging`]**, **[`ids`]** - Options, subscriber setup, request ids
//! - **[`cli`]** - The `routechain` binary's commands
//!
//! ### Request Handling Flow
//!
//! ```text
//! Router::handle(request)
//!   └─ chain: [route 0] → [route 1] → … → [route n] → empty 404
//!        each link:
//!          method not allowed   → next.run(request)
//!          pattern no match     → next.run(request)
//!          matched              → handler(request, RouteContext, next)
//!                                   answers  → response
//!                                   delegates → next.run(request)
//! ```
//!
//! Handler errors are returned from [`Router::handle`](router::Router::handle)
//! unchanged; the router never turns them into responses. Registration errors
//! ([`RouterError`]) are raised immediately and leave the router untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use routechain::{response, Request, Router};
//! use routechain::handler::{sync_handler, RouteContext};
//! use routechain::middleware::Next;
//! use http::StatusCode;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router
//!     .all("*", |req: Request, _ctx: RouteContext, next: Next| async move {
//!         // runs for every request, then hands it on
//!         next.run(req).await
//!     })?
//!     .get("/users/:id", sync_handler(|_req, ctx| {
//!         let id = ctx.param("id").unwrap_or_default();
//!         Ok(Some(response::text(StatusCode::OK, format!("user {id}"))))
//!     }))?;
//!
//! let req = http::Request::get("http://localhost/users/100").body(Default::default())?;
//! let res = futures::executor::block_on(router.handle(req))?;
//! assert_eq!(res.body().as_ref(), b"user 100");
//!
//! let missing = http::Request::get("http://localhost/nope").body(Default::default())?;
//! let res = futures::executor::block_on(router.handle(missing))?;
//! assert_eq!(res.status(), StatusCode::NOT_FOUND);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod echo;
pub mod error;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod path;
pub mod pattern;
pub mod registry;
pub mod response;
pub mod route;
pub mod router;
pub mod table;

/// Requests carry their body as bytes
pub type Request = http::Request<bytes::Bytes>;
pub type Response = http::Response<bytes::Bytes>;

pub use config::RouterOptions;
pub use error::RouterError;
pub use handler::{sync_handler, Handler, HandlerRegistry, HandlerResult, RouteContext};
pub use middleware::Next;
pub use pattern::{MatchResult, PatternInit, UrlPattern};
pub use route::{RouteEntry, RoutePath};
pub use router::{Router, RouterLike};
pub use table::RouteTable;
