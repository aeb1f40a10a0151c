use std::sync::Arc;

use futures_util::future::join_all;
use tracing::info;

use crate::middleware::chain::MiddlewareHandler;
use crate::middleware::{
    BoxHandler, CorsConfig, CorsMiddleware, Middleware, MiddlewareChain, RequestLogger,
    SecretAuthMiddleware,
};
use crate::routing::{apply_group, Endpoint, EndpointRegistry};
use crate::server::builtin::builtin_endpoints;
use crate::server::context::ServerContext;
use crate::server::handler::{RequestHandler, Router};
use crate::server::listener::ServerListener;
use crate::server::Result;
use crate::settings::ServerSettings;

enum PendingBatch {
    Plain(Vec<Endpoint>),
    Group {
        prefix: String,
        endpoints: Vec<Endpoint>,
        middlewares: Vec<Arc<dyn Middleware>>,
    },
}

/// 서버 구성 빌더입니다.
///
/// 엔드포인트 선언, 미들웨어 등록, 그룹 구성을 모아 두었다가 `build`
/// 시점에 한 번에 검증하고 고정합니다. 빌드가 끝나면 레지스트리는 더
/// 이상 변경할 수 없습니다.
pub struct Server {
    pub name: String,
    pub number: String,
    pub port: u16,
    pub secret: String,
    pub debug: bool,
    pub path_prefix: String,
    pub ignore_secret: bool,
    pub running_message: Option<String>,
    cors: Option<CorsConfig>,
    middlewares: MiddlewareChain,
    auth_override: Option<Arc<dyn Middleware>>,
    batches: Vec<PendingBatch>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    pub fn new() -> Self {
        Server {
            name: String::new(),
            number: String::new(),
            port: 8080,
            secret: String::new(),
            debug: false,
            path_prefix: String::new(),
            ignore_secret: false,
            running_message: None,
            cors: None,
            middlewares: MiddlewareChain::new(),
            auth_override: None,
            batches: Vec::new(),
        }
    }

    pub fn from_settings(settings: &ServerSettings) -> Self {
        let mut server = Server::new();
        server.name = settings.name.clone().unwrap_or_default();
        server.port = settings.port;
        server.secret = settings.secret.clone();
        server.debug = settings.debug;
        server.path_prefix = settings.path_prefix.clone();
        server.ignore_secret = settings.ignore_secret;
        server
    }

    /// 엔드포인트 하나를 추가합니다.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.batches.push(PendingBatch::Plain(vec![endpoint]));
        self
    }

    /// 엔드포인트 묶음을 추가합니다.
    pub fn endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.batches.push(PendingBatch::Plain(endpoints));
        self
    }

    /// 경로 접두사를 공유하는 엔드포인트 그룹을 추가합니다.
    pub fn group(self, prefix: impl Into<String>, endpoints: Vec<Endpoint>) -> Self {
        self.group_with(prefix, endpoints, Vec::new())
    }

    /// 그룹 범위 미들웨어와 함께 엔드포인트 그룹을 추가합니다.
    ///
    /// 그룹 미들웨어는 이 그룹의 엔드포인트에만 적용되며 서버 전역
    /// 체인과는 독립적입니다.
    pub fn group_with(
        mut self,
        prefix: impl Into<String>,
        endpoints: Vec<Endpoint>,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> Self {
        self.batches.push(PendingBatch::Group {
            prefix: prefix.into(),
            endpoints,
            middlewares,
        });
        self
    }

    /// 서버 전역 미들웨어를 선언 순서대로 추가합니다. 먼저 추가된
    /// 미들웨어가 요청마다 먼저 실행됩니다.
    pub fn use_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.add(middleware);
        self
    }

    /// 기본 시크릿 게이트를 사용자 정의 인증 미들웨어로 교체합니다.
    pub fn auth_override(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.auth_override = Some(middleware);
        self
    }

    pub fn cors(mut self, config: CorsConfig) -> Self {
        self.cors = Some(config);
        self
    }

    /// 선언된 구성을 검증하고 실행 가능한 서버 인스턴스를 만듭니다.
    ///
    /// 잘못된 패턴이나 중복 핸들러 같은 설정 오류는 여기서 치명적으로
    /// 실패합니다. 리스너가 시작되기 전에 전부 드러나야 합니다.
    pub fn build(mut self) -> Result<ServerInstance> {
        if self.name.is_empty() {
            if self.number.is_empty() {
                self.number = "0".to_string();
            }
            self.name = format!("Server {}", self.number);
        }

        // 그룹 접두사 재작성 후 전체를 하나의 목록으로 수집
        let mut endpoints: Vec<Endpoint> = Vec::new();
        for batch in self.batches {
            match batch {
                PendingBatch::Plain(batch) => endpoints.extend(batch),
                PendingBatch::Group {
                    prefix,
                    endpoints: batch,
                    middlewares,
                } => {
                    let group_middlewares = if middlewares.is_empty() {
                        None
                    } else {
                        Some(middlewares.as_slice())
                    };
                    endpoints.extend(apply_group(&prefix, batch, group_middlewares)?);
                }
            }
        }

        // 진단 엔드포인트는 접두사 대상이 아니므로 재작성 전에 합류해도 됨
        endpoints.extend(builtin_endpoints());

        if !self.path_prefix.is_empty() {
            endpoints = apply_group(&self.path_prefix, endpoints, None)?;
        }

        let mut registry = EndpointRegistry::new(self.debug);
        registry.register_batch(endpoints)?;

        let context = Arc::new(ServerContext {
            server_name: self.name,
            server_number: self.number,
            secret: self.secret,
            debug: self.debug,
            path_prefix: self.path_prefix,
            ignore_secret: self.ignore_secret,
            registry,
        });

        // 파이프라인 합성. 안쪽부터: 라우터 <- 사용자 체인 <- 시크릿
        // 게이트 <- 디버그 로거 <- CORS
        let mut pipeline: BoxHandler = Arc::new(Router);
        pipeline = self.middlewares.compose(pipeline);

        if let Some(auth) = self.auth_override {
            pipeline = Arc::new(MiddlewareHandler::new(auth, pipeline));
        } else if !context.secret.is_empty() && !context.ignore_secret {
            pipeline = Arc::new(MiddlewareHandler::new(
                Arc::new(SecretAuthMiddleware::new(context.secret.clone())),
                pipeline,
            ));
        }

        if context.debug {
            pipeline = Arc::new(MiddlewareHandler::new(Arc::new(RequestLogger), pipeline));
        }

        if let Some(cors) = self.cors {
            pipeline = Arc::new(MiddlewareHandler::new(
                Arc::new(CorsMiddleware::new(cors)),
                pipeline,
            ));
        }

        Ok(ServerInstance {
            context,
            pipeline,
            port: self.port,
            running_message: self.running_message,
        })
    }
}

/// 빌드가 끝난 실행 가능한 서버입니다.
pub struct ServerInstance {
    context: Arc<ServerContext>,
    pipeline: BoxHandler,
    port: u16,
    running_message: Option<String>,
}

impl ServerInstance {
    pub fn context(&self) -> Arc<ServerContext> {
        self.context.clone()
    }

    /// 합성된 파이프라인에 연결된 요청 핸들러를 반환합니다.
    pub fn request_handler(&self) -> RequestHandler {
        RequestHandler::new(self.context.clone(), self.pipeline.clone())
    }

    /// 기본 주소(`0.0.0.0:<port>`)에 바인딩해 서빙을 시작합니다.
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = ServerListener::bind(&addr).await?;
        self.run_with(listener).await
    }

    /// 미리 바인딩된 리스너로 서빙을 시작합니다.
    pub async fn run_with(self, listener: ServerListener) -> Result<()> {
        let message = self.running_message.clone().unwrap_or_else(|| {
            format!(
                "[{}] listening on {}",
                self.context.server_name,
                listener.local_addr()
            )
        });
        info!("{}", message);

        let handler = Arc::new(RequestHandler::new(self.context, self.pipeline));
        listener.run(handler).await
    }
}

/// 여러 서버 인스턴스를 동시에 실행하고 전부 끝날 때까지 기다립니다.
///
/// 각 서버에는 목록 순서에 따른 번호가 부여됩니다. 인스턴스들은 가변
/// 상태를 공유하지 않습니다.
pub async fn serve(servers: Vec<Server>) -> Result<()> {
    let futures = servers.into_iter().enumerate().map(|(index, mut server)| {
        server.number = index.to_string();
        async move { server.build()?.run().await }
    });

    let results = join_all(futures).await;
    for result in results {
        result?;
    }
    Ok(())
}
