#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("인증 실패: {0}")]
    Unauthorized(String),

    #[error("매칭되는 엔드포인트 없음: {method} {path}")]
    NotFound { method: String, path: String },

    #[error("잘못된 요청: {0}")]
    InvalidRequest(String),

    #[error("처리 오류: {0}")]
    Processing(String),
}
