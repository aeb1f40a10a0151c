use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::middleware::{BoxHandler, Handler, Middleware, MiddlewareError, Request, Response};
use crate::server::ServerContext;

/// 공유 시크릿 헤더 이름
pub const SECRET_HEADER: &str = "x-secret";

/// 공유 시크릿 인증 게이트
///
/// 비공개 엔드포인트로 향하는 모든 요청의 `x-secret` 헤더를 설정된
/// 시크릿과 비교합니다. 공개 엔드포인트는 헤더 유무와 무관하게 그대로
/// 통과합니다. 헤더가 없거나 값이 다르면 체인을 중단하고 401을
/// 반환합니다.
pub struct SecretAuthMiddleware {
    secret: String,
}

impl SecretAuthMiddleware {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

/// 타이밍 차이로 시크릿 값이 유출되지 않도록 고정 시간으로 비교합니다.
fn secrets_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let mut diff = provided.len() ^ expected.len();
    for (a, b) in provided.iter().zip(expected.iter()) {
        diff |= (a ^ b) as usize;
    }
    diff == 0
}

#[async_trait]
impl Middleware for SecretAuthMiddleware {
    fn name(&self) -> &str {
        "secret-auth"
    }

    async fn handle(
        &self,
        req: Request,
        ctx: Arc<ServerContext>,
        next: BoxHandler,
    ) -> Result<Response, MiddlewareError> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        // 공개 엔드포인트는 검사 없이 통과
        if ctx.registry.is_public(method.as_str(), &path) {
            return Ok(next.handle(req, ctx.clone()).await);
        }

        let provided = req
            .headers()
            .get(SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        match provided {
            Some(value) if secrets_match(&value, &self.secret) => {
                Ok(next.handle(req, ctx.clone()).await)
            }
            Some(_) => {
                debug!(method = %method, path = %path, "시크릿 불일치로 요청 거부");
                Err(MiddlewareError::Unauthorized(
                    "invalid x-secret header".to_string(),
                ))
            }
            None => {
                debug!(method = %method, path = %path, "시크릿 헤더 누락으로 요청 거부");
                Err(MiddlewareError::Unauthorized(
                    "missing x-secret header".to_string(),
                ))
            }
        }
    }
}
