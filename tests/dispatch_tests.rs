//! Request-time behavior: fallthrough, delegation, params and errors

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, StatusCode};
use routechain::handler::sync_handler;
use routechain::pattern::PatternInit;
use routechain::{response, Next, Request, RouteContext, RoutePath, Router, UrlPattern};

fn request(method: Method, url: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(url)
        .body(Bytes::new())
        .unwrap()
}

fn text(body: &'static str) -> impl routechain::Handler {
    sync_handler(move |_req, _ctx| Ok(Some(response::text(StatusCode::OK, body))))
}

fn counting(calls: &Arc<AtomicUsize>, body: &'static str) -> impl routechain::Handler {
    let calls = Arc::clone(calls);
    sync_handler(move |_req, _ctx| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(response::text(StatusCode::OK, body)))
    })
}

async fn body_of(router: &Router, method: Method, url: &str) -> (StatusCode, Bytes) {
    let res = router.handle(request(method, url)).await.unwrap();
    (res.status(), res.body().clone())
}

#[tokio::test]
async fn test_no_match_is_empty_404() {
    let mut router = Router::new();
    router.get("/users", text("users")).unwrap();

    let res = router
        .handle(request(Method::GET, "http://test/nothing"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.body().is_empty());

    let empty = Router::new();
    let res = empty.handle(request(Method::GET, "http://test/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_method_mismatch_falls_through() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .post(RoutePath::Wildcard, counting(&calls, "post"))
        .unwrap()
        .get(RoutePath::Wildcard, text("ok"))
        .unwrap();

    let (status, body) = body_of(&router, Method::GET, "http://test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pattern_mismatch_falls_through() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .get("/:id", counting(&calls, "id"))
        .unwrap()
        .get(RoutePath::Wildcard, text("ok"))
        .unwrap();

    let (_, body) = body_of(&router, Method::GET, "http://test").await;
    assert_eq!(body, "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_first_match_wins() {
    let later = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .get("/users/:id", text("first"))
        .unwrap()
        .get("/users/:id", counting(&later, "second"))
        .unwrap();

    let (_, body) = body_of(&router, Method::GET, "http://test/users/1").await;
    assert_eq!(body, "first");
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_catch_all_that_delegates_lets_later_handler_answer() {
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_handler = Arc::clone(&seen);

    let mut router = Router::new();
    router
        .all(RoutePath::Wildcard, move |req: Request, _ctx: RouteContext, next: Next| {
            seen_in_handler.fetch_add(1, Ordering::SeqCst);
            next.run(req)
        })
        .unwrap()
        .get("/match", text("ok"))
        .unwrap();

    let (status, body) = body_of(&router, Method::GET, "http://test/match").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_catch_all_that_answers_blocks_later_handler() {
    let later = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .all(RoutePath::Wildcard, text("blocked"))
        .unwrap()
        .get("/match", counting(&later, "never"))
        .unwrap();

    let (_, body) = body_of(&router, Method::GET, "http://test/match").await;
    assert_eq!(body, "blocked");
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_route_context_params_and_match() {
    let mut router = Router::new();
    router
        .get("/:id", |req: Request, ctx: RouteContext, _next: Next| async move {
            assert_eq!(ctx.params.len(), 1);
            assert_eq!(ctx.param("id"), Some("100"));

            let expected = UrlPattern::new(PatternInit::pathname("/:id"))?
                .exec(&req.uri().to_string())
                .ok_or_else(|| anyhow::anyhow!("pattern should match"))?;
            assert_eq!(ctx.match_result, expected);
            assert_eq!(ctx.match_result.pathname.groups["id"], "100");

            Ok::<_, anyhow::Error>(response::empty(StatusCode::NO_CONTENT))
        })
        .unwrap();

    let res = router
        .handle(request(Method::GET, "http://test/100"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_sync_handler_none_delegates() {
    let mut router = Router::new();
    router
        .get(
            "/items/:id",
            sync_handler(|_req, ctx| {
                if ctx.param("id") == Some("special") {
                    Ok(Some(response::text(StatusCode::OK, "special")))
                } else {
                    Ok(None)
                }
            }),
        )
        .unwrap()
        .get("/items/:id", text("generic"))
        .unwrap();

    let (_, body) = body_of(&router, Method::GET, "http://test/items/special").await;
    assert_eq!(body, "special");
    let (_, body) = body_of(&router, Method::GET, "http://test/items/7").await;
    assert_eq!(body, "generic");
}

#[tokio::test]
async fn test_nested_routers_dispatch_end_to_end() {
    let mut user = Router::new();
    user.get("/:id", |_req: Request, ctx: RouteContext, _next: Next| async move {
        let id = ctx.param("id").unwrap_or_default().to_string();
        Ok::<_, anyhow::Error>(response::text(StatusCode::OK, format!("user {id}")))
    })
    .unwrap();

    let mut users = Router::with_base("/users").unwrap();
    users.get("/", text("list")).unwrap().use_router(&user).unwrap();

    let mut api = Router::with_base("/api").unwrap();
    api.use_router(&users).unwrap();

    let (_, body) = body_of(&api, Method::GET, "http://test/api/users/100").await;
    assert_eq!(body, "user 100");
    let (_, body) = body_of(&api, Method::GET, "http://test/api/users/").await;
    assert_eq!(body, "list");
    let (status, _) = body_of(&api, Method::GET, "http://test/users/100").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_origin_form_uses_host_header() {
    let mut router = Router::new();
    router
        .get(
            PatternInit::pathname("/admin").with_hostname("admin.example.com"),
            text("admin"),
        )
        .unwrap();

    let mut req = request(Method::GET, "/admin");
    req.headers_mut().insert(
        http::header::HOST,
        http::HeaderValue::from_static("admin.example.com"),
    );
    let res = router.handle(req).await.unwrap();
    assert_eq!(res.body(), &Bytes::from_static(b"admin"));

    let (status, _) = body_of(&router, Method::GET, "/admin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_handler_can_rewrite_response_from_next() {
    let mut router = Router::new();
    router
        .all(RoutePath::Wildcard, |req: Request, _ctx: RouteContext, next: Next| async move {
            let mut res = next.run(req).await?;
            res.headers_mut()
                .insert("x-served-by", http::HeaderValue::from_static("routechain"));
            Ok::<_, anyhow::Error>(res)
        })
        .unwrap()
        .get("/a", text("a"))
        .unwrap();

    let res = router.handle(request(Method::GET, "http://test/a")).await.unwrap();
    assert_eq!(res.headers()["x-served-by"], "routechain");

    let res = router.handle(request(Method::GET, "http://test/b")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["x-served-by"], "routechain");
}

#[tokio::test]
async fn test_async_handler_is_awaited() {
    let mut router = Router::new();
    router
        .get("/slow", |_req: Request, _ctx: RouteContext, _next: Next| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok::<_, anyhow::Error>(response::text(StatusCode::OK, "done"))
        })
        .unwrap();

    let (_, body) = body_of(&router, Method::GET, "http://test/slow").await;
    assert_eq!(body, "done");
}

#[derive(Debug, PartialEq)]
struct TeapotError(u16);

impl fmt::Display for TeapotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "teapot {}", self.0)
    }
}

impl std::error::Error for TeapotError {}

#[tokio::test]
async fn test_handler_error_propagates_unchanged() {
    let later = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .get(
            "/fail",
            sync_handler(|_req, _ctx| Err(anyhow::Error::new(TeapotError(418)))),
        )
        .unwrap()
        .all(RoutePath::Wildcard, counting(&later, "after"))
        .unwrap();

    let err = router
        .handle(request(Method::GET, "http://test/fail"))
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<TeapotError>(), Some(&TeapotError(418)));
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_dispatch_on_shared_router() {
    let mut router = Router::new();
    router
        .get("/n/:n", |_req: Request, ctx: RouteContext, _next: Next| async move {
            tokio::task::yield_now().await;
            let n = ctx.param("n").unwrap_or_default().to_string();
            Ok::<_, anyhow::Error>(response::text(StatusCode::OK, n))
        })
        .unwrap();
    let router = Arc::new(router);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let router = Arc::clone(&router);
            tokio::spawn(async move {
                let url = format!("http://test/n/{i}");
                let res = router.handle(request(Method::GET, &url)).await.unwrap();
                assert_eq!(res.body(), &Bytes::from(i.to_string()));
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}
