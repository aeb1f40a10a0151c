use serde::{Deserialize, Serialize};

/// CORS 래퍼 옵션
///
/// 핵심 파이프라인 바깥에서 적용되는 고정 옵션 구조체입니다.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// 허용할 Origin 목록
    #[serde(default)]
    pub allow_origins: Vec<String>,

    /// 허용할 HTTP 메서드 목록
    #[serde(default = "default_methods")]
    pub allow_methods: Vec<String>,

    /// 허용할 헤더 목록
    #[serde(default)]
    pub allow_headers: Vec<String>,

    /// 노출할 헤더 목록
    #[serde(default)]
    pub expose_headers: Vec<String>,

    /// preflight 요청 캐시 시간 (초)
    #[serde(default)]
    pub max_age: Option<u32>,

    /// credentials 허용 여부
    #[serde(default)]
    pub allow_credentials: bool,
}

fn default_methods() -> Vec<String> {
    vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .into_iter()
        .map(String::from)
        .collect()
}
