//! Micro Gateway는 범용 HTTP 서버 프리미티브 위에 올라가는 경량
//! 라우팅/미들웨어 합성 라이브러리입니다.
//!
//! # 주요 기능
//!
//! - `"<METHOD> /path/{param}"` 패턴 기반 라우트 매칭
//! - 결정적 매칭 우선순위 (정적 패턴 우선, 긴 패턴 우선)
//! - 선언 순서를 보존하는 미들웨어 파이프라인 합성
//! - 공유 시크릿 인증 게이트와 디버그 요청 로거
//! - 경로 접두사/그룹 재작성과 그룹 범위 미들웨어
//!
//! # 예제
//!
//! ```
//! use micro_gateway::routing::{Endpoint, EndpointRegistry};
//!
//! let mut registry = EndpointRegistry::new(false);
//! registry.register(Endpoint::new("GET /users/{id}")).unwrap();
//!
//! // 자리표시자는 비어 있지 않은 한 구간과 매칭됨
//! assert!(registry.lookup("GET", "/users/42").is_some());
//! assert!(registry.lookup("GET", "/users/").is_none());
//! ```
//!
//! # 그룹 재작성
//!
//! ```
//! use micro_gateway::routing::{apply_group, Endpoint};
//!
//! let rewritten = apply_group("/api/v1", vec![Endpoint::new("GET /users")], None).unwrap();
//! assert_eq!(rewritten[0].pattern, "GET /api/v1/users");
//! ```
//!
//! # 서버 구성
//!
//! ```
//! use hyper::StatusCode;
//! use micro_gateway::response::plain_response;
//! use micro_gateway::routing::Endpoint;
//! use micro_gateway::server::Server;
//!
//! let instance = Server::new()
//!     .endpoint(Endpoint::new("GET /hello").handler_fn(|_req| async {
//!         plain_response(StatusCode::OK, "hello")
//!     }))
//!     .build()
//!     .unwrap();
//!
//! // 진단 엔드포인트는 자동 등록됨
//! assert!(instance.context().registry.lookup("GET", "/_health").is_some());
//! ```

pub mod logging;
pub mod middleware;
pub mod response;
pub mod routing;
pub mod scheme;
pub mod server;
pub mod settings;
