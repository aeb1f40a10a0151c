use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;

use crate::middleware::MiddlewareError;
use crate::server::ServerContext;

/// 파이프라인을 흐르는 요청. 본문은 연결 계층에서 미리 수집됩니다.
pub type Request = hyper::Request<Bytes>;

/// 파이프라인이 생성하는 응답.
pub type Response = hyper::Response<Full<Bytes>>;

/// 공유 가능한 핸들러 참조.
pub type BoxHandler = Arc<dyn Handler>;

/// 요청을 받아 응답을 생성하는 최종 단위입니다.
///
/// 서버 컨텍스트는 시작 시점에 한 번 만들어져 모든 핸들러와 미들웨어에
/// 참조로 전달됩니다. 요청 처리 중에는 읽기 전용입니다.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: Request, ctx: Arc<ServerContext>) -> Response;
}

/// 미들웨어 트레이트
///
/// 다음 핸들러를 감싸 요청 전후에 개입하거나 체인을 중단할 수 있는
/// 인터페이스를 정의합니다. 에러를 반환하면 체인이 그 지점에서 끝나고
/// 에러가 HTTP 응답으로 변환됩니다.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// 미들웨어의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    /// 요청을 처리하고 필요하면 `next`로 전달합니다.
    async fn handle(
        &self,
        req: Request,
        ctx: Arc<ServerContext>,
        next: BoxHandler,
    ) -> Result<Response, MiddlewareError>;
}

/// 클로저를 `Handler`로 쓰기 위한 래퍼입니다. 주로 테스트와 데모에서
/// 사용합니다.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send,
{
    async fn handle(&self, req: Request, _ctx: Arc<ServerContext>) -> Response {
        (self.0)(req).await
    }
}
