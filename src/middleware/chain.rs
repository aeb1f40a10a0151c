use std::sync::Arc;

use async_trait::async_trait;

use crate::middleware::response::handle_middleware_error;
use crate::middleware::{BoxHandler, Handler, Middleware, Request, Response};
use crate::server::ServerContext;

/// 선언 순서를 유지하는 미들웨어 목록입니다.
///
/// `compose`는 역순으로 래핑하므로 목록의 첫 번째 미들웨어가 가장
/// 바깥에 놓여 요청마다 가장 먼저 실행됩니다.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    pub fn add_arc(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// 내부 핸들러를 체인 전체로 감싼 핸들러를 만듭니다.
    pub fn compose(&self, inner: BoxHandler) -> BoxHandler {
        let mut handler = inner;
        // 역순 래핑. 인덱스 0이 최외곽이 됨
        for middleware in self.middlewares.iter().rev() {
            handler = Arc::new(MiddlewareHandler::new(middleware.clone(), handler));
        }
        handler
    }
}

/// 미들웨어 하나와 다음 핸들러를 묶어 `Handler`로 만드는 어댑터입니다.
///
/// 미들웨어가 에러를 반환하면 체인이 여기서 끝나고 에러가 HTTP 응답으로
/// 변환됩니다.
pub struct MiddlewareHandler {
    middleware: Arc<dyn Middleware>,
    next: BoxHandler,
}

impl MiddlewareHandler {
    pub fn new(middleware: Arc<dyn Middleware>, next: BoxHandler) -> Self {
        Self { middleware, next }
    }
}

#[async_trait]
impl Handler for MiddlewareHandler {
    async fn handle(&self, req: Request, ctx: Arc<ServerContext>) -> Response {
        match self.middleware.handle(req, ctx, self.next.clone()).await {
            Ok(response) => response,
            Err(e) => handle_middleware_error(e),
        }
    }
}
