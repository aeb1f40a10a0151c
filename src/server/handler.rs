use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use tracing::{debug, error};
use uuid::Uuid;

use crate::middleware::{BoxHandler, Handler, Request, Response};
use crate::response::plain_response;
use crate::server::ServerContext;

/// 레지스트리 기반 최종 라우터입니다. 합성된 파이프라인의 가장 안쪽에
/// 놓입니다.
///
/// 레지스트리 조회로 엔드포인트를 해석해 그 핸들러를 실행하고, 매칭이
/// 없으면 404를 반환합니다.
pub struct Router;

#[async_trait]
impl Handler for Router {
    async fn handle(&self, req: Request, ctx: Arc<ServerContext>) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match ctx.registry.lookup(method.as_str(), &path) {
            Some(endpoint) => endpoint.invoke(req, ctx.clone()).await,
            None => {
                debug!(method = %method, path = %path, "매칭되는 엔드포인트 없음");
                plain_response(StatusCode::NOT_FOUND, "Not Found")
            }
        }
    }
}

/// 연결 계층과 합성된 파이프라인을 잇는 요청 핸들러입니다.
pub struct RequestHandler {
    context: Arc<ServerContext>,
    pipeline: BoxHandler,
}

impl RequestHandler {
    pub fn new(context: Arc<ServerContext>, pipeline: BoxHandler) -> Self {
        Self { context, pipeline }
    }

    pub fn context(&self) -> Arc<ServerContext> {
        self.context.clone()
    }

    /// 인바운드 요청을 파이프라인에 전달합니다.
    ///
    /// 본문은 파이프라인에 들어가기 전에 버퍼링됩니다. 핵심 계층은
    /// 본문 스트리밍에 관여하지 않습니다.
    pub async fn handle_request(
        &self,
        req: hyper::Request<Incoming>,
    ) -> Result<Response, Infallible> {
        let request_id = Uuid::new_v4();
        let (parts, body) = req.into_parts();

        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                error!(request_id = %request_id, error = %e, "요청 본문 수집 실패");
                return Ok(plain_response(StatusCode::BAD_REQUEST, "Bad Request"));
            }
        };

        debug!(
            request_id = %request_id,
            method = %parts.method,
            path = %parts.uri.path(),
            "요청 수신"
        );

        let req = Request::from_parts(parts, bytes);
        Ok(self.pipeline.handle(req, self.context.clone()).await)
    }

    /// 커넥션 하나를 HTTP/1 프로토콜로 서빙합니다.
    pub async fn handle_connection<I>(
        &self,
        io: I,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(io, service_fn(|req| self.handle_request(req)))
            .await
            .map_err(|e| e.into())
    }
}
