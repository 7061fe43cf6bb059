use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use crate::handler::HandlerResult;
use crate::{Request, Response};

/// One link of the chain: answer the request, or delegate through `next`
pub trait Middleware: Send + Sync {
    fn handle(&self, request: Request, next: Next) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(&self, request: Request, next: Next) -> BoxFuture<'static, HandlerResult> {
        self(request, next).boxed()
    }
}

/// Shared, immutable middleware sequence
pub type MiddlewareChain = Arc<[Arc<dyn Middleware>]>;

/// Continuation over the rest of a chain
///
/// `Next` is owned and consumed by [`Next::run`], so each link can delegate
/// at most once and no link runs twice for the same request. When the chain
/// is exhausted the fallback response is returned.
pub struct Next {
    chain: MiddlewareChain,
    index: usize,
    fallback: Response,
}

impl Next {
    #[must_use]
    pub fn new(chain: MiddlewareChain, fallback: Response) -> Self {
        Self {
            chain,
            index: 0,
            fallback,
        }
    }

    /// Run the remainder of the chain with `request`
    pub fn run(self, request: Request) -> BoxFuture<'static, HandlerResult> {
        let Next {
            chain,
            index,
            fallback,
        } = self;

        match chain.get(index).map(Arc::clone) {
            Some(middleware) => {
                let next = Next {
                    chain,
                    index: index + 1,
                    fallback,
                };
                middleware.handle(request, next)
            }
            None => {
                debug!(
                    chain_len = chain.len(),
                    status = fallback.status().as_u16(),
                    "Chain exhausted, resolving to fallback response"
                );
                futures::future::ready(Ok(fallback)).boxed()
            }
        }
    }

    /// Links not yet reached
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.index)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &self.remaining())
            .field("fallback_status", &self.fallback.status())
            .finish()
    }
}

/// Run `request` through `middleware` in order, ending in `fallback`
pub fn chain(
    request: Request,
    fallback: Response,
    middleware: MiddlewareChain,
) -> BoxFuture<'static, HandlerResult> {
    Next::new(middleware, fallback).run(request)
}
