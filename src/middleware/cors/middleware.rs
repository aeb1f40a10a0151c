use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, HeaderMap, Method, Response as HttpResponse};
use tracing::debug;

use super::config::CorsConfig;
use crate::middleware::{BoxHandler, Handler, Middleware, MiddlewareError, Request, Response};
use crate::server::ServerContext;

/// CORS 미들웨어
///
/// preflight `OPTIONS` 요청은 직접 응답하고, 일반 요청은 통과시킨 뒤
/// 응답에 CORS 헤더를 주입합니다. 구성된 경우 파이프라인의 최외곽에
/// 적용됩니다.
#[derive(Debug)]
pub struct CorsMiddleware {
    config: CorsConfig,
}

impl CorsMiddleware {
    pub fn new(config: CorsConfig) -> Self {
        Self { config }
    }

    /// Origin 검증
    fn validate_origin(&self, origin: &str) -> bool {
        self.config
            .allow_origins
            .iter()
            .any(|allowed| allowed == "*" || allowed == origin)
    }

    /// 기본 CORS 헤더 설정
    fn set_cors_headers(&self, headers: &mut HeaderMap, origin: &str) {
        if self.validate_origin(origin) {
            if let Ok(value) = origin.parse() {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
        }

        if self.config.allow_credentials {
            if let Ok(value) = "true".parse() {
                headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, value);
            }
        }

        if !self.config.expose_headers.is_empty() {
            if let Ok(value) = self.config.expose_headers.join(", ").parse() {
                headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, value);
            }
        }
    }

    /// Preflight 요청 처리
    fn handle_preflight(&self, req: &Request) -> Result<Response, MiddlewareError> {
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| MiddlewareError::InvalidRequest("Missing origin header".into()))?;

        if !self.validate_origin(origin) {
            return Err(MiddlewareError::InvalidRequest("Origin not allowed".into()));
        }

        let mut response = HttpResponse::new(Full::new(Bytes::new()));
        let headers = response.headers_mut();

        self.set_cors_headers(headers, origin);

        if let Ok(value) = self.config.allow_methods.join(", ").parse() {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, value);
        }

        if !self.config.allow_headers.is_empty() {
            if let Ok(value) = self.config.allow_headers.join(", ").parse() {
                headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, value);
            }
        }

        if let Some(max_age) = self.config.max_age {
            if let Ok(value) = max_age.to_string().parse() {
                headers.insert(header::ACCESS_CONTROL_MAX_AGE, value);
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl Middleware for CorsMiddleware {
    fn name(&self) -> &str {
        "cors"
    }

    async fn handle(
        &self,
        req: Request,
        ctx: Arc<ServerContext>,
        next: BoxHandler,
    ) -> Result<Response, MiddlewareError> {
        // OPTIONS 요청은 preflight로 처리
        if req.method() == Method::OPTIONS {
            debug!("CORS preflight 요청 처리");
            return self.handle_preflight(&req);
        }

        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        // 일반 요청의 Origin 검증
        if let Some(origin) = &origin {
            if !self.validate_origin(origin) {
                return Err(MiddlewareError::InvalidRequest("Origin not allowed".into()));
            }
        }

        let mut response = next.handle(req, ctx.clone()).await;

        if let Some(origin) = origin {
            self.set_cors_headers(response.headers_mut(), &origin);
        }

        Ok(response)
    }
}
