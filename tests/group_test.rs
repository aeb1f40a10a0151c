use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use hyper::StatusCode;

use micro_gateway::middleware::{
    BoxHandler, Handler, Middleware, MiddlewareError, Request, Response,
};
use micro_gateway::response::plain_response;
use micro_gateway::routing::{apply_group, Endpoint, EndpointRegistry, RoutingError};
use micro_gateway::server::ServerContext;

/// 실행 순서를 기록하는 테스트 미들웨어
struct TagMiddleware {
    tag: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Middleware for TagMiddleware {
    fn name(&self) -> &str {
        self.tag
    }

    async fn handle(
        &self,
        req: Request,
        ctx: Arc<ServerContext>,
        next: BoxHandler,
    ) -> Result<Response, MiddlewareError> {
        self.log.lock().unwrap().push(self.tag.to_string());
        Ok(next.handle(req, ctx).await)
    }
}

fn empty_context() -> Arc<ServerContext> {
    Arc::new(ServerContext {
        server_name: "Test".to_string(),
        server_number: "0".to_string(),
        secret: String::new(),
        debug: false,
        path_prefix: String::new(),
        ignore_secret: false,
        registry: EndpointRegistry::new(false),
    })
}

fn get_request(path: &str) -> Request {
    hyper::Request::builder()
        .method("GET")
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

#[test]
fn test_group_prefix_spec_scenario() {
    // applyGroup("/api/v1", ["GET /users"]) => "GET /api/v1/users"
    let rewritten = apply_group("/api/v1", vec![Endpoint::new("GET /users")], None).unwrap();
    assert_eq!(rewritten[0].pattern, "GET /api/v1/users");
}

#[test]
fn test_group_root_path_collapses_to_prefix() {
    let rewritten = apply_group("/api/v1", vec![Endpoint::new("GET /")], None).unwrap();
    assert_eq!(rewritten[0].pattern, "GET /api/v1", "루트 경로는 접두사로 축약되고 슬래시가 중복되지 않음");
}

#[test]
fn test_group_is_total_over_batch() {
    let endpoints = vec![
        Endpoint::new("GET /a"),
        Endpoint::new("POST /b"),
        Endpoint::new("GET /_meta").ignore_prefix(),
    ];

    let rewritten = apply_group("/api", endpoints, None).unwrap();
    assert_eq!(rewritten[0].pattern, "GET /api/a");
    assert_eq!(rewritten[1].pattern, "POST /api/b");
    assert_eq!(rewritten[2].pattern, "GET /_meta");
}

#[test]
fn test_group_malformed_pattern_fails() {
    let result = apply_group("/api", vec![Endpoint::new("GET")], None);
    assert!(matches!(result, Err(RoutingError::InvalidPattern { .. })));
}

#[tokio::test]
async fn test_group_middleware_wraps_endpoint_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_handler = log.clone();

    let endpoint = Endpoint::new("GET /users").handler_fn(move |_req| {
        let log = log_handler.clone();
        async move {
            log.lock().unwrap().push("handler".to_string());
            plain_response(StatusCode::OK, "ok")
        }
    });

    let middlewares: Vec<Arc<dyn Middleware>> = vec![
        Arc::new(TagMiddleware { tag: "m1", log: log.clone() }),
        Arc::new(TagMiddleware { tag: "m2", log: log.clone() }),
    ];

    let rewritten = apply_group("/api", vec![endpoint], Some(middlewares.as_slice())).unwrap();
    assert_eq!(rewritten[0].pattern, "GET /api/users");

    let response = rewritten[0]
        .invoke(get_request("/api/users"), empty_context())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 순차 래핑: 나중에 적용된 미들웨어가 최외곽이 되어 먼저 실행됨.
    // 각 래핑이 직전 핸들러 참조를 보존했는지도 함께 검증됨
    let order = log.lock().unwrap().clone();
    assert_eq!(order, vec!["m2", "m1", "handler"]);
}

#[tokio::test]
async fn test_group_middleware_scoped_to_group_only() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let grouped = Endpoint::new("GET /inside")
        .handler_fn(|_req| async { plain_response(StatusCode::OK, "in") });
    let outside = Endpoint::new("GET /outside")
        .handler_fn(|_req| async { plain_response(StatusCode::OK, "out") });

    let middlewares: Vec<Arc<dyn Middleware>> =
        vec![Arc::new(TagMiddleware { tag: "group", log: log.clone() })];

    let rewritten = apply_group("/api", vec![grouped], Some(middlewares.as_slice())).unwrap();

    // 그룹 밖 엔드포인트 실행은 그룹 미들웨어를 거치지 않음
    outside.invoke(get_request("/outside"), empty_context()).await;
    assert!(log.lock().unwrap().is_empty());

    rewritten[0].invoke(get_request("/api/inside"), empty_context()).await;
    assert_eq!(log.lock().unwrap().as_slice(), ["group"]);
}

#[test]
fn test_group_middleware_requires_handler() {
    let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(TagMiddleware {
        tag: "m",
        log: Arc::new(Mutex::new(Vec::new())),
    })];

    let result = apply_group("/api", vec![Endpoint::new("GET /none")], Some(middlewares.as_slice()));
    assert!(matches!(result, Err(RoutingError::MissingHandler { .. })));
}
