use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::middleware::{Handler, Request, Response};
use crate::routing::error::RoutingError;
use crate::routing::pattern::RoutePattern;
use crate::server::ServerContext;

/// 요청만 받는 핸들러 함수
pub type PlainFn = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// 서버 컨텍스트를 함께 받는 핸들러 함수
pub type ContextFn =
    Arc<dyn Fn(Request, Arc<ServerContext>) -> BoxFuture<'static, Response> + Send + Sync>;

/// 엔드포인트가 가질 수 있는 세 가지 핸들러 표현입니다.
///
/// 하나의 엔드포인트는 정확히 하나의 변형만 가질 수 있습니다.
/// 두 개 이상을 설정하면 등록 시점에 `RoutingError::ConflictingHandlers`로
/// 거부됩니다.
#[derive(Clone)]
pub enum HandlerKind {
    /// 요청만 받는 일반 핸들러
    Plain(PlainFn),
    /// 서버 컨텍스트를 함께 받는 핸들러
    WithContext(ContextFn),
    /// 미리 구성된 핸들러 객체
    Object(Arc<dyn Handler>),
}

impl HandlerKind {
    pub async fn invoke(&self, req: Request, ctx: Arc<ServerContext>) -> Response {
        match self {
            HandlerKind::Plain(f) => f(req).await,
            HandlerKind::WithContext(f) => f(req, ctx).await,
            HandlerKind::Object(h) => h.handle(req, ctx).await,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            HandlerKind::Plain(_) => "plain",
            HandlerKind::WithContext(_) => "with_context",
            HandlerKind::Object(_) => "object",
        }
    }
}

impl fmt::Debug for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerKind::{}", self.kind_name())
    }
}

/// 엔드포인트 노출 옵션입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointOptions {
    /// 공개 엔드포인트 여부 (시크릿 게이트 우회)
    pub is_public: bool,
    /// 인증이 필요 없는 엔드포인트 여부
    pub no_auth_required: bool,
    /// 접두사 재작성 대상에서 제외 여부
    pub ignore_prefix: bool,
}

/// 직렬화 가능한 엔드포인트 레코드입니다.
///
/// 핸들러 참조는 데이터가 아니므로 종류 이름만 포함합니다.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointRecord {
    pub pattern: String,
    pub options: EndpointOptions,
    pub handler: Option<&'static str>,
}

/// 라우팅 가능한 하나의 작업 단위입니다.
///
/// `"<METHOD> <path>"` 패턴, 노출 옵션, 핸들러 변형 하나로 구성됩니다.
/// 매처는 레지스트리 등록 시점에 컴파일되며 이후 변경되지 않습니다.
#[derive(Clone)]
pub struct Endpoint {
    pub pattern: String,
    pub options: EndpointOptions,
    handler: Option<HandlerKind>,
    handler_conflict: bool,
    matcher: Option<RoutePattern>,
}

impl Endpoint {
    pub fn new(pattern: impl Into<String>) -> Self {
        Endpoint {
            pattern: pattern.into(),
            options: EndpointOptions::default(),
            handler: None,
            handler_conflict: false,
            matcher: None,
        }
    }

    /// 일반 핸들러 함수를 설정합니다.
    pub fn handler_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.set_handler(HandlerKind::Plain(Arc::new(move |req| {
            let fut: BoxFuture<'static, Response> = Box::pin(f(req));
            fut
        })));
        self
    }

    /// 서버 컨텍스트를 받는 핸들러 함수를 설정합니다.
    pub fn context_handler_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Request, Arc<ServerContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.set_handler(HandlerKind::WithContext(Arc::new(move |req, ctx| {
            let fut: BoxFuture<'static, Response> = Box::pin(f(req, ctx));
            fut
        })));
        self
    }

    /// 미리 구성된 핸들러 객체를 설정합니다.
    pub fn handler_object(mut self, handler: Arc<dyn Handler>) -> Self {
        self.set_handler(HandlerKind::Object(handler));
        self
    }

    pub fn options(mut self, options: EndpointOptions) -> Self {
        self.options = options;
        self
    }

    pub fn public(mut self) -> Self {
        self.options.is_public = true;
        self
    }

    pub fn no_auth(mut self) -> Self {
        self.options.no_auth_required = true;
        self
    }

    pub fn ignore_prefix(mut self) -> Self {
        self.options.ignore_prefix = true;
        self
    }

    fn set_handler(&mut self, kind: HandlerKind) {
        if self.handler.is_some() {
            self.handler_conflict = true;
        }
        self.handler = Some(kind);
    }

    /// 핸들러 설정이 올바른지 검증합니다. 등록 시점에 호출됩니다.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if self.handler_conflict {
            return Err(RoutingError::ConflictingHandlers {
                pattern: self.pattern.clone(),
            });
        }
        Ok(())
    }

    pub fn is_public(&self) -> bool {
        self.options.is_public
    }

    pub fn requires_auth(&self) -> bool {
        !self.options.no_auth_required
    }

    pub fn handler_kind(&self) -> Option<&HandlerKind> {
        self.handler.as_ref()
    }

    /// 핸들러를 교체합니다. 그룹 미들웨어 래핑 전용이며 등록 이후에는
    /// 호출되지 않습니다.
    pub(crate) fn replace_handler(&mut self, kind: HandlerKind) {
        self.handler = Some(kind);
    }

    pub(crate) fn take_handler(&mut self) -> Option<HandlerKind> {
        self.handler.take()
    }

    pub(crate) fn set_matcher(&mut self, matcher: RoutePattern) {
        self.matcher = Some(matcher);
    }

    pub fn matcher(&self) -> Option<&RoutePattern> {
        self.matcher.as_ref()
    }

    /// `"<METHOD> <path>"` 조회 문자열과의 매칭 여부를 검사합니다.
    pub fn matches(&self, lookup: &str) -> bool {
        self.matcher.as_ref().map(|m| m.matches(lookup)).unwrap_or(false)
    }

    /// 매처에 포함된 자리표시자 개수. 컴파일 전에는 0입니다.
    pub fn param_count(&self) -> usize {
        self.matcher.as_ref().map(|m| m.param_count()).unwrap_or(0)
    }

    /// 엔드포인트 핸들러를 실행합니다. 핸들러가 없으면 404를 반환합니다.
    pub async fn invoke(&self, req: Request, ctx: Arc<ServerContext>) -> Response {
        match &self.handler {
            Some(kind) => kind.invoke(req, ctx).await,
            None => crate::response::plain_response(hyper::StatusCode::NOT_FOUND, "Not Found"),
        }
    }

    pub fn record(&self) -> EndpointRecord {
        EndpointRecord {
            pattern: self.pattern.clone(),
            options: self.options,
            handler: self.handler.as_ref().map(HandlerKind::kind_name),
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("pattern", &self.pattern)
            .field("options", &self.options)
            .field("handler", &self.handler.as_ref().map(HandlerKind::kind_name))
            .finish()
    }
}
