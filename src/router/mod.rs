//! # Router Module
//!
//! The public face of the crate: register routes, compose routers, dispatch
//! requests.
//!
//! ## Overview
//!
//! A [`Router`] owns an ordered [`Registry`](crate::registry::Registry) of
//! routes. Dispatch projects those routes into a middleware chain (one
//! [`RouteMiddleware`](crate::middleware::RouteMiddleware) per route) and
//! runs the request through it:
//!
//! 1. **Registration**: `get`, `post`, ..., `all` and `route` compile the
//!    pattern and append an entry. Registration order is match order.
//!
//! 2. **Composition**: `use_router` appends another router's routes, with
//!    that router's base already applied, after the existing ones.
//!
//! 3. **Dispatch**: `handle` walks the chain. A route whose method or pattern
//!    does not fit is skipped; a matching handler answers or delegates with
//!    `next.run(request)`. Past the last route the result is an empty 404.
//!
//! ## Example
//!
//! ```rust
//! use routechain::router::Router;
//! use routechain::handler::RouteContext;
//! use routechain::middleware::Next;
//! use routechain::{response, Request};
//! use http::StatusCode;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut users = Router::with_base("/users")?;
//! users.get("/:id", |_req: Request, ctx: RouteContext, _next: Next| async move {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     Ok::<_, anyhow::Error>(response::text(StatusCode::OK, id))
//! })?;
//!
//! let mut api = Router::with_base("/api")?;
//! api.use_router(&users)?;
//!
//! let req = http::Request::get("http://localhost/api/users/100").body(Default::default())?;
//! let res = futures::executor::block_on(api.handle(req))?;
//! assert_eq!(res.status(), StatusCode::OK);
//! assert_eq!(res.body().as_ref(), b"100");
//! # Ok(())
//! # }
//! ```

mod core;

pub use self::core::{Router, RouterLike};
