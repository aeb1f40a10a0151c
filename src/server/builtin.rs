use std::collections::BTreeMap;
use std::sync::Arc;

use hyper::StatusCode;

use crate::middleware::{Request, Response};
use crate::response::{json_response, plain_response, serialization_error_response};
use crate::routing::{Endpoint, EndpointOptions};
use crate::server::ServerContext;

/// 진단 엔드포인트 옵션. 항상 공개, 인증 불요, 접두사 제외.
const DIAGNOSTIC_OPTIONS: EndpointOptions = EndpointOptions {
    is_public: true,
    no_auth_required: true,
    ignore_prefix: true,
};

/// 라이브러리가 자동 등록하는 진단 엔드포인트 목록입니다.
pub(crate) fn builtin_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new("GET /_health")
            .context_handler_fn(health)
            .options(DIAGNOSTIC_OPTIONS),
        Endpoint::new("GET /_routes")
            .context_handler_fn(routes_list)
            .options(DIAGNOSTIC_OPTIONS),
        Endpoint::new("GET /_routes/raw")
            .context_handler_fn(raw_routes_list)
            .options(DIAGNOSTIC_OPTIONS),
    ]
}

/// 서버가 동작 중인지 확인합니다.
async fn health(_req: Request, ctx: Arc<ServerContext>) -> Response {
    plain_response(StatusCode::OK, format!("{} is running", ctx.server_name))
}

/// 등록된 패턴 문자열을 자기 자신에 매핑한 JSON 객체를 반환합니다.
async fn routes_list(_req: Request, ctx: Arc<ServerContext>) -> Response {
    let routes: BTreeMap<&str, &str> = ctx
        .registry
        .list()
        .into_iter()
        .map(|endpoint| (endpoint.pattern.as_str(), endpoint.pattern.as_str()))
        .collect();

    json_response(StatusCode::OK, &routes).unwrap_or_else(|e| serialization_error_response(&e))
}

/// 전체 엔드포인트 레코드를 반환합니다. 핸들러 참조는 직렬화할 수
/// 없으므로 페이로드에서 제외됩니다.
async fn raw_routes_list(_req: Request, ctx: Arc<ServerContext>) -> Response {
    let records = ctx.registry.records();
    json_response(StatusCode::OK, &records).unwrap_or_else(|e| serialization_error_response(&e))
}
