use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::middleware::{BoxHandler, Handler, Middleware, MiddlewareError, Request, Response};
use crate::server::ServerContext;

/// 로깅에서 제외되는 헬스 체크 경로
pub const HEALTH_PATH: &str = "/_health";

/// 디버그 모드 요청 로거 겸 라우트 가드
///
/// 헬스 체크를 제외한 모든 요청에 대해 `[<서버 이름>] <메서드> <경로>`
/// 형태의 트레이스를 남긴 뒤 레지스트리를 조회합니다. 매칭되는
/// 엔드포인트가 없으면 나머지 체인을 실행하지 않고 404로 중단합니다.
/// 알려진 라우트는 로깅 후 그대로 전달됩니다.
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    fn name(&self) -> &str {
        "request-logger"
    }

    async fn handle(
        &self,
        req: Request,
        ctx: Arc<ServerContext>,
        next: BoxHandler,
    ) -> Result<Response, MiddlewareError> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        if path != HEALTH_PATH {
            debug!("[{}] {} {}", ctx.server_name, method, path);
        }

        if ctx.registry.lookup(method.as_str(), &path).is_none() {
            return Err(MiddlewareError::NotFound {
                method: method.to_string(),
                path,
            });
        }

        Ok(next.handle(req, ctx.clone()).await)
    }
}
