use hyper::StatusCode;
use serde_json::json;
use tracing::error;

use micro_gateway::logging::init_logging;
use micro_gateway::response::{
    page_options, paginated_response, plain_response, serialization_error_response,
    PaginationOptions,
};
use micro_gateway::routing::Endpoint;
use micro_gateway::server::Server;
use micro_gateway::settings::Settings;

#[tokio::main]
async fn main() {
    let settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            std::process::exit(1);
        }
    };

    let _guard = init_logging(&settings.logging);

    let server = Server::from_settings(&settings.server)
        .endpoint(Endpoint::new("GET /hello/{name}").handler_fn(|req| async move {
            let name = req.uri().path().rsplit('/').next().unwrap_or("world");
            plain_response(StatusCode::OK, format!("hello, {}", name))
        }))
        .group(
            "/api/v1",
            vec![Endpoint::new("GET /items").handler_fn(|req| async move {
                let query = req.uri().query().unwrap_or("");
                let (skip, limit, page) = page_options(query);

                // 데모용 고정 데이터
                let items = json!([{"id": skip + 1}, {"id": skip + 2}]);
                paginated_response(
                    StatusCode::OK,
                    PaginationOptions {
                        page,
                        limit,
                        skip,
                        total: 50,
                        path: "/api/v1/items".to_string(),
                        payload: items,
                    },
                )
                .unwrap_or_else(|e| serialization_error_response(&e))
            })],
        );

    let instance = match server.build() {
        Ok(instance) => instance,
        Err(e) => {
            // 잘못된 라우트 테이블로는 트래픽을 받지 않음
            error!(error = %e, "서버 구성 실패");
            std::process::exit(1);
        }
    };

    if let Err(e) = instance.run().await {
        error!(error = %e, "서버 실행 실패");
        std::process::exit(1);
    }
}
