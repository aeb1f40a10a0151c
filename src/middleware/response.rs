use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use super::MiddlewareError;

/// 미들웨어 에러를 HTTP 응답으로 변환합니다.
///
/// 체인을 중단시킨 에러는 여기서 지역적으로 복구되며, 고정된 본문을
/// 가진 응답이 됩니다.
pub fn handle_middleware_error(err: MiddlewareError) -> Response<Full<Bytes>> {
    let (status, body) = match &err {
        MiddlewareError::Config(_) | MiddlewareError::Processing(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
        MiddlewareError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        MiddlewareError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not Found"),
        MiddlewareError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
    };

    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}
