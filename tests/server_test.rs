use std::collections::HashMap;
use std::net::SocketAddr;

use hyper::StatusCode;

use micro_gateway::response::plain_response;
use micro_gateway::routing::Endpoint;
use micro_gateway::server::{Server, ServerListener};

/// 테스트용 서버를 임의 포트에 띄우고 주소를 반환합니다.
async fn spawn_server(server: Server) -> SocketAddr {
    let instance = server.build().expect("서버 빌드 실패");
    let listener = ServerListener::bind("127.0.0.1:0").await.expect("바인딩 실패");
    let addr = listener.local_addr();

    tokio::spawn(async move {
        let _ = instance.run_with(listener).await;
    });

    addr
}

fn hello_endpoint() -> Endpoint {
    Endpoint::new("GET /hello")
        .handler_fn(|_req| async { plain_response(StatusCode::OK, "hello") })
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut server = Server::new();
    server.name = "TestServer".to_string();
    let addr = spawn_server(server.endpoint(hello_endpoint())).await;

    let resp = reqwest::get(format!("http://{}/_health", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "TestServer is running");
}

#[tokio::test]
async fn test_default_server_name() {
    let addr = spawn_server(Server::new()).await;

    let resp = reqwest::get(format!("http://{}/_health", addr)).await.unwrap();
    assert_eq!(resp.text().await.unwrap(), "Server 0 is running");
}

#[tokio::test]
async fn test_routes_endpoint_lists_patterns() {
    let addr = spawn_server(Server::new().endpoint(hello_endpoint())).await;

    let resp = reqwest::get(format!("http://{}/_routes", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let routes: HashMap<String, String> = resp.json().await.unwrap();
    assert_eq!(routes.get("GET /hello").map(String::as_str), Some("GET /hello"));
    assert!(routes.contains_key("GET /_health"));
    assert!(routes.contains_key("GET /_routes/raw"));
}

#[tokio::test]
async fn test_raw_routes_exclude_handler_references() {
    let addr = spawn_server(Server::new().endpoint(hello_endpoint())).await;

    let resp = reqwest::get(format!("http://{}/_routes/raw", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let records: serde_json::Value = resp.json().await.unwrap();
    let records = records.as_array().expect("배열이어야 함");
    assert!(!records.is_empty());
    for record in records {
        assert!(record.get("pattern").is_some());
        assert!(record.get("options").is_some());
        // 핸들러는 종류 이름 문자열로만 나타남
        assert!(record["handler"].is_null() || record["handler"].is_string());
    }
}

#[tokio::test]
async fn test_parameterized_route_end_to_end() {
    let server = Server::new().endpoint(
        Endpoint::new("GET /users/{id}")
            .handler_fn(|_req| async { plain_response(StatusCode::OK, "user") }),
    );
    let addr = spawn_server(server).await;

    let resp = reqwest::get(format!("http://{}/users/42", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = reqwest::get(format!("http://{}/users/", addr)).await.unwrap();
    assert_eq!(resp.status(), 404, "빈 매개변수 구간은 404여야 함");
}

#[tokio::test]
async fn test_secret_gate_end_to_end() {
    let mut server = Server::new();
    server.secret = "abc".to_string();
    let server = server
        .endpoint(
            Endpoint::new("GET /private")
                .handler_fn(|_req| async { plain_response(StatusCode::OK, "secret ok") }),
        )
        .endpoint(
            Endpoint::new("GET /open")
                .public()
                .handler_fn(|_req| async { plain_response(StatusCode::OK, "open") }),
        );
    let addr = spawn_server(server).await;

    let client = reqwest::Client::new();

    // 헤더 없음 => 401
    let resp = client
        .get(format!("http://{}/private", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // 잘못된 값 => 401
    let resp = client
        .get(format!("http://{}/private", addr))
        .header("x-secret", "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // 정확히 일치 => 통과
    let resp = client
        .get(format!("http://{}/private", addr))
        .header("x-secret", "abc")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "secret ok");

    // 공개 엔드포인트는 헤더 없이 통과
    let resp = client.get(format!("http://{}/open", addr)).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    // 진단 엔드포인트도 항상 공개
    let resp = client
        .get(format!("http://{}/_health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_ignore_secret_disables_gate() {
    let mut server = Server::new();
    server.secret = "abc".to_string();
    server.ignore_secret = true;
    let addr = spawn_server(server.endpoint(
        Endpoint::new("GET /private")
            .handler_fn(|_req| async { plain_response(StatusCode::OK, "ok") }),
    ))
    .await;

    let resp = reqwest::get(format!("http://{}/private", addr)).await.unwrap();
    assert_eq!(resp.status(), 200, "ignore_secret이면 게이트가 구성되지 않아야 함");
}

#[tokio::test]
async fn test_debug_mode_unknown_route_404() {
    let mut server = Server::new();
    server.debug = true;
    let addr = spawn_server(server.endpoint(hello_endpoint())).await;

    // 디버그 모드에서 미등록 경로는 404로 중단됨
    let resp = reqwest::get(format!("http://{}/missing", addr)).await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = reqwest::get(format!("http://{}/hello", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_path_prefix_applies_to_user_routes_only() {
    let mut server = Server::new();
    server.path_prefix = "/svc".to_string();
    let addr = spawn_server(server.endpoint(hello_endpoint())).await;

    let resp = reqwest::get(format!("http://{}/svc/hello", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = reqwest::get(format!("http://{}/hello", addr)).await.unwrap();
    assert_eq!(resp.status(), 404, "접두사 없는 원래 경로는 더 이상 매칭되지 않음");

    // 진단 엔드포인트는 접두사 대상이 아님
    let resp = reqwest::get(format!("http://{}/_health", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_group_end_to_end() {
    let server = Server::new().group(
        "/api/v1",
        vec![
            Endpoint::new("GET /users")
                .handler_fn(|_req| async { plain_response(StatusCode::OK, "users") }),
            Endpoint::new("GET /")
                .handler_fn(|_req| async { plain_response(StatusCode::OK, "root") }),
        ],
    );
    let addr = spawn_server(server).await;

    let resp = reqwest::get(format!("http://{}/api/v1/users", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    // 루트 경로는 접두사 자체로 축약됨
    let resp = reqwest::get(format!("http://{}/api/v1", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "root");
}

#[tokio::test]
async fn test_debug_404_takes_priority_over_auth() {
    // 디버그 로거가 최외곽이므로 미등록 경로는 인증 검사 전에 404가 됨
    let mut server = Server::new();
    server.debug = true;
    server.secret = "abc".to_string();
    let addr = spawn_server(server.endpoint(hello_endpoint())).await;

    let resp = reqwest::get(format!("http://{}/missing", addr)).await.unwrap();
    assert_eq!(resp.status(), 404, "401이 아니라 404여야 함");
}

#[tokio::test]
async fn test_auth_override_replaces_builtin_gate() {
    use async_trait::async_trait;
    use micro_gateway::middleware::{
        BoxHandler, Handler, Middleware, MiddlewareError, Request, Response,
    };
    use micro_gateway::server::ServerContext;
    use std::sync::Arc;

    // x-secret 대신 x-token 헤더를 검사하는 대체 인증
    struct TokenAuth;

    #[async_trait]
    impl Middleware for TokenAuth {
        fn name(&self) -> &str {
            "token-auth"
        }

        async fn handle(
            &self,
            req: Request,
            ctx: Arc<ServerContext>,
            next: BoxHandler,
        ) -> Result<Response, MiddlewareError> {
            match req.headers().get("x-token") {
                Some(value) if value == "token-ok" => Ok(next.handle(req, ctx).await),
                _ => Err(MiddlewareError::Unauthorized("missing x-token".to_string())),
            }
        }
    }

    let mut server = Server::new();
    server.secret = "abc".to_string();
    let server = server
        .auth_override(Arc::new(TokenAuth))
        .endpoint(
            Endpoint::new("GET /private")
                .handler_fn(|_req| async { plain_response(StatusCode::OK, "ok") }),
        );
    let addr = spawn_server(server).await;

    let client = reqwest::Client::new();

    // 기본 게이트가 교체되었으므로 x-secret은 더 이상 통하지 않음
    let resp = client
        .get(format!("http://{}/private", addr))
        .header("x-secret", "abc")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .get(format!("http://{}/private", addr))
        .header("x-token", "token-ok")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_user_middleware_runs_on_every_request() {
    use async_trait::async_trait;
    use micro_gateway::middleware::{
        BoxHandler, Handler, Middleware, MiddlewareError, Request, Response,
    };
    use micro_gateway::server::ServerContext;
    use std::sync::Arc;

    struct StampMiddleware;

    #[async_trait]
    impl Middleware for StampMiddleware {
        fn name(&self) -> &str {
            "stamp"
        }

        async fn handle(
            &self,
            req: Request,
            ctx: Arc<ServerContext>,
            next: BoxHandler,
        ) -> Result<Response, MiddlewareError> {
            let mut response = next.handle(req, ctx).await;
            if let Ok(value) = "applied".parse() {
                response.headers_mut().insert("x-stamp", value);
            }
            Ok(response)
        }
    }

    let server = Server::new()
        .use_middleware(StampMiddleware)
        .endpoint(hello_endpoint());
    let addr = spawn_server(server).await;

    let resp = reqwest::get(format!("http://{}/hello", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("x-stamp").and_then(|v| v.to_str().ok()),
        Some("applied")
    );
}

#[tokio::test]
async fn test_from_settings_wiring() {
    use micro_gateway::settings::ServerSettings;

    let settings = ServerSettings {
        name: Some("Configured".to_string()),
        port: 8080,
        secret: "abc".to_string(),
        debug: true,
        path_prefix: "/svc".to_string(),
        ignore_secret: false,
    };

    let instance = Server::from_settings(&settings)
        .endpoint(hello_endpoint())
        .build()
        .unwrap();

    let ctx = instance.context();
    assert_eq!(ctx.server_name, "Configured");
    assert!(ctx.debug);
    assert_eq!(ctx.secret, "abc");
    assert!(ctx.registry.lookup("GET", "/svc/hello").is_some());
    assert!(ctx.registry.lookup("GET", "/hello").is_none());
}

#[tokio::test]
async fn test_cors_preflight_end_to_end() {
    use micro_gateway::middleware::CorsConfig;

    let server = Server::new()
        .cors(CorsConfig {
            allow_origins: vec!["https://example.com".to_string()],
            ..Default::default()
        })
        .endpoint(hello_endpoint());
    let addr = spawn_server(server).await;

    let client = reqwest::Client::new();
    let resp = client
        .request(reqwest::Method::OPTIONS, format!("http://{}/hello", addr))
        .header("origin", "https://example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://example.com")
    );
}

#[tokio::test]
async fn test_conflicting_handlers_fail_build() {
    let endpoint = Endpoint::new("GET /dup")
        .handler_fn(|_req| async { plain_response(StatusCode::OK, "a") })
        .handler_fn(|_req| async { plain_response(StatusCode::OK, "b") });

    let result = Server::new().endpoint(endpoint).build();
    assert!(result.is_err(), "핸들러 중복은 빌드 단계에서 실패해야 함");
}

#[tokio::test]
async fn test_invalid_pattern_fails_build() {
    let result = Server::new().endpoint(Endpoint::new("GET /bad/{open")).build();
    assert!(result.is_err(), "잘못된 패턴은 빌드 단계에서 실패해야 함");
}
