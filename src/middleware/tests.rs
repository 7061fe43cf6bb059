use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};

use super::{chain, request_url, Middleware, MiddlewareChain, Next};
use crate::handler::{RouteContext, sync_handler};
use crate::pattern::UrlPattern;
use crate::route::RouteEntry;
use crate::{response, Request};

fn links(items: Vec<Arc<dyn Middleware>>) -> MiddlewareChain {
    items.into()
}

fn request(method: Method, uri: &str) -> Request {
    let mut req = Request::new(Bytes::new());
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

#[tokio::test]
async fn test_empty_chain_resolves_to_fallback() {
    let res = chain(request(Method::GET, "/"), response::not_found(), links(vec![]))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn test_every_link_delegating_reaches_fallback_once_each() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = |calls: Arc<AtomicUsize>| -> Arc<dyn Middleware> {
        Arc::new(move |req: Request, next: Next| {
            calls.fetch_add(1, Ordering::SeqCst);
            next.run(req)
        })
    };
    let chain_links = links(vec![
        counter(Arc::clone(&calls)),
        counter(Arc::clone(&calls)),
        counter(Arc::clone(&calls)),
    ]);

    let fallback = response::text(StatusCode::IM_A_TEAPOT, "fallback");
    let res = chain(request(Method::GET, "/"), fallback, chain_links)
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_short_circuit_stops_later_links() {
    let later = Arc::new(AtomicUsize::new(0));
    let later_calls = Arc::clone(&later);
    let chain_links = links(vec![
        Arc::new(|_req: Request, _next: Next| async {
            Ok::<_, anyhow::Error>(response::text(StatusCode::OK, "first"))
        }),
        Arc::new(move |req: Request, next: Next| {
            later_calls.fetch_add(1, Ordering::SeqCst);
            next.run(req)
        }),
    ]);

    let res = chain(request(Method::GET, "/"), response::not_found(), chain_links)
        .await
        .unwrap();
    assert_eq!(res.body(), &Bytes::from_static(b"first"));
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_modified_request_flows_downstream() {
    let chain_links = links(vec![
        Arc::new(|mut req: Request, next: Next| {
            req.headers_mut()
                .insert("x-seen", http::HeaderValue::from_static("yes"));
            next.run(req)
        }),
        Arc::new(|req: Request, _next: Next| async move {
            let seen = req.headers().contains_key("x-seen");
            Ok::<_, anyhow::Error>(response::text(StatusCode::OK, seen.to_string()))
        }),
    ]);

    let res = chain(request(Method::GET, "/"), response::not_found(), chain_links)
        .await
        .unwrap();
    assert_eq!(res.body(), &Bytes::from_static(b"true"));
}

#[tokio::test]
async fn test_post_processing_after_next() {
    let chain_links = links(vec![
        Arc::new(|req: Request, next: Next| async move {
            let mut res = next.run(req).await?;
            res.headers_mut()
                .insert("x-wrapped", http::HeaderValue::from_static("1"));
            Ok::<_, anyhow::Error>(res)
        }),
        Arc::new(|_req: Request, _next: Next| async {
            Ok::<_, anyhow::Error>(response::empty(StatusCode::NO_CONTENT))
        }),
    ]);

    let res = chain(request(Method::GET, "/"), response::not_found(), chain_links)
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()["x-wrapped"], "1");
}

#[tokio::test]
async fn test_suspending_link_is_awaited() {
    let chain_links = links(vec![Arc::new(|_req: Request, _next: Next| async {
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        Ok::<_, anyhow::Error>(response::text(StatusCode::OK, "late"))
    })]);

    let res = chain(request(Method::GET, "/"), response::not_found(), chain_links)
        .await
        .unwrap();
    assert_eq!(res.body(), &Bytes::from_static(b"late"));
}

#[tokio::test]
async fn test_error_propagates_unchanged() {
    #[derive(Debug)]
    struct Boom;
    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom")
        }
    }
    impl std::error::Error for Boom {}

    let chain_links = links(vec![Arc::new(|_req: Request, _next: Next| async {
        Err::<crate::Response, _>(anyhow::Error::new(Boom))
    })]);

    let err = chain(request(Method::GET, "/"), response::not_found(), chain_links)
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<Boom>().is_some());
}

#[tokio::test]
async fn test_route_middleware_skips_on_method_and_pattern() {
    let handler = sync_handler(|_req, ctx: &RouteContext| {
        Ok(Some(response::text(
            StatusCode::OK,
            ctx.param("id").unwrap_or("-").to_string(),
        )))
    });
    let entry = RouteEntry::new(
        [Method::GET],
        UrlPattern::parse("/:id").unwrap(),
        Arc::new(handler),
    );
    let chain_links = links(vec![entry.into_middleware()]);

    let hit = chain(
        request(Method::GET, "http://test/100"),
        response::not_found(),
        Arc::clone(&chain_links),
    )
    .await
    .unwrap();
    assert_eq!(hit.body(), &Bytes::from_static(b"100"));

    let wrong_method = chain(
        request(Method::POST, "http://test/100"),
        response::not_found(),
        Arc::clone(&chain_links),
    )
    .await
    .unwrap();
    assert_eq!(wrong_method.status(), StatusCode::NOT_FOUND);

    let wrong_path = chain(
        request(Method::GET, "http://test/"),
        response::not_found(),
        chain_links,
    )
    .await
    .unwrap();
    assert_eq!(wrong_path.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_request_url_forms() {
    assert_eq!(
        request_url(&request(Method::GET, "https://example.com/a?b=c")),
        "https://example.com/a?b=c"
    );
    assert_eq!(
        request_url(&request(Method::GET, "/pets/1?x=1")),
        "http://localhost/pets/1?x=1"
    );

    let mut with_host = request(Method::GET, "/pets/1");
    with_host
        .headers_mut()
        .insert(http::header::HOST, http::HeaderValue::from_static("api.test:8080"));
    assert_eq!(request_url(&with_host), "http://api.test:8080/pets/1");
}

#[test]
fn test_next_reports_remaining() {
    let chain_links = links(vec![Arc::new(|req: Request, next: Next| next.run(req))]);
    let next = Next::new(chain_links, response::not_found());
    assert_eq!(next.remaining(), 1);
}
