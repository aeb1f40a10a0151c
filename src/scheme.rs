/// 요청의 스킴을 판별합니다.
///
/// 프록시/CDN이 설정하는 `X-Forwarded-Proto`를 먼저 보고, 다음으로
/// RFC 7239 `Forwarded` 헤더의 `proto=` 토큰을 찾습니다. 둘 다 없으면
/// 직접 TLS 연결 여부로 판단하고, 마지막 기본값은 `"http"`입니다.
/// 로깅과 URL 생성 쪽에서 사용합니다.
pub fn request_scheme<B>(req: &hyper::Request<B>, direct_tls: bool) -> String {
    if let Some(proto) = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
    {
        if !proto.is_empty() {
            return proto.to_string();
        }
    }

    if let Some(forwarded) = req
        .headers()
        .get("forwarded")
        .and_then(|v| v.to_str().ok())
    {
        for part in forwarded.split(';') {
            let part = part.trim();
            if part.to_lowercase().starts_with("proto=") {
                if let Some(value) = part.splitn(2, '=').nth(1) {
                    return value.trim_matches('"').to_string();
                }
            }
        }
    }

    if direct_tls {
        return "https".to_string();
    }

    "http".to_string()
}
