use std::sync::Arc;

use crate::middleware::chain::MiddlewareHandler;
use crate::middleware::{Handler, Middleware};
use crate::routing::endpoint::{Endpoint, HandlerKind};
use crate::routing::error::RoutingError;

/// 엔드포인트 묶음의 패턴에 경로 접두사를 삽입하고, 선택적으로 그룹
/// 범위 미들웨어를 각 엔드포인트의 핸들러에 래핑합니다.
///
/// `ignore_prefix`가 설정된 엔드포인트는 접두사 재작성 대상에서
/// 제외됩니다. 경로가 정확히 `"/"`이면 접두사 자체로 축약되어 끝에
/// 슬래시가 중복되지 않습니다.
///
/// 그룹 미들웨어는 재작성 시점에 엔드포인트 단위로 적용됩니다. 서버
/// 전역 미들웨어 체인과 달리 해당 그룹의 엔드포인트에만 영향을 주며,
/// 여러 개가 주어지면 순서대로 겹쳐 쌓입니다. 각 래핑은 직전 래핑
/// 결과를 내부 핸들러로 이어받습니다.
pub fn apply_group(
    prefix: &str,
    endpoints: Vec<Endpoint>,
    group_middlewares: Option<&[Arc<dyn Middleware>]>,
) -> Result<Vec<Endpoint>, RoutingError> {
    let mut rewritten = Vec::with_capacity(endpoints.len());

    for mut endpoint in endpoints {
        if !endpoint.options.ignore_prefix {
            endpoint.pattern = insert_prefix(prefix, &endpoint.pattern)?;
        }

        if let Some(middlewares) = group_middlewares {
            if !middlewares.is_empty() {
                endpoint = wrap_with_middlewares(endpoint, middlewares)?;
            }
        }

        rewritten.push(endpoint);
    }

    Ok(rewritten)
}

/// 패턴을 메서드 토큰과 경로 토큰으로 나누고 경로 앞에 접두사를 삽입합니다.
fn insert_prefix(prefix: &str, pattern: &str) -> Result<String, RoutingError> {
    let (method, path) = pattern
        .split_once(' ')
        .ok_or_else(|| RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "메서드와 경로가 공백으로 구분되어야 함".to_string(),
        })?;

    if path.is_empty() {
        return Err(RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "경로 토큰이 비어 있음".to_string(),
        });
    }

    if path == "/" {
        // 루트 경로는 접두사 자체로 축약
        Ok(format!("{} {}", method, prefix))
    } else {
        Ok(format!("{} {}{}", method, prefix, path))
    }
}

fn wrap_with_middlewares(
    mut endpoint: Endpoint,
    middlewares: &[Arc<dyn Middleware>],
) -> Result<Endpoint, RoutingError> {
    let kind = endpoint
        .take_handler()
        .ok_or_else(|| RoutingError::MissingHandler {
            pattern: endpoint.pattern.clone(),
        })?;

    let mut handler: Arc<dyn Handler> = Arc::new(KindHandler(kind));
    for middleware in middlewares {
        handler = Arc::new(MiddlewareHandler::new(middleware.clone(), handler));
    }

    endpoint.replace_handler(HandlerKind::Object(handler));
    Ok(endpoint)
}

/// `HandlerKind`를 `Handler` 트레이트 객체로 감싸는 어댑터입니다.
struct KindHandler(HandlerKind);

#[async_trait::async_trait]
impl Handler for KindHandler {
    async fn handle(
        &self,
        req: crate::middleware::Request,
        ctx: Arc<crate::server::ServerContext>,
    ) -> crate::middleware::Response {
        self.0.invoke(req, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_prefix_basic() {
        assert_eq!(insert_prefix("/api/v1", "GET /users").unwrap(), "GET /api/v1/users");
    }

    #[test]
    fn test_insert_prefix_root_collapses() {
        assert_eq!(insert_prefix("/api/v1", "GET /").unwrap(), "GET /api/v1");
    }

    #[test]
    fn test_insert_prefix_malformed_pattern() {
        assert!(insert_prefix("/api", "GET").is_err());
        assert!(insert_prefix("/api", "GET ").is_err());
    }

    #[test]
    fn test_apply_group_respects_ignore_prefix() {
        let endpoints = vec![
            Endpoint::new("GET /users"),
            Endpoint::new("GET /_health").ignore_prefix(),
        ];

        let rewritten = apply_group("/api", endpoints, None).unwrap();
        assert_eq!(rewritten[0].pattern, "GET /api/users");
        assert_eq!(rewritten[1].pattern, "GET /_health", "ignore_prefix 엔드포인트는 그대로여야 함");
    }
}
