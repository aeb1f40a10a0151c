use regex_lite as regex;

use crate::routing::error::RoutingError;

/// `"<METHOD> <path>"` 형식의 라우트 패턴을 컴파일한 매처입니다.
///
/// 경로 구간의 `{name}` 자리표시자는 `/`를 제외한 1글자 이상과 매칭되는
/// 캡처 그룹으로 치환되고, 전체 식은 양끝이 고정됩니다. 부분 매칭이나
/// 접두사 매칭은 허용되지 않습니다.
///
/// 컴파일은 엔드포인트 등록 시점에 한 번만 수행됩니다. 요청마다
/// 재컴파일하지 않습니다.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    pattern: String,
    regex: regex::Regex,
    param_count: usize,
}

impl RoutePattern {
    /// 패턴 문자열을 앵커된 정규식으로 컴파일합니다.
    ///
    /// 닫히지 않은 `{` 또는 빈 자리표시자 이름은
    /// `RoutingError::InvalidPattern`으로 실패합니다. 자리표시자 이름은
    /// 보존하지 않으며 중복 이름도 오류가 아닙니다.
    pub fn compile(pattern: &str) -> Result<Self, RoutingError> {
        let mut source = String::with_capacity(pattern.len() + 16);
        source.push('^');

        let mut param_count = 0usize;
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            let (literal, remainder) = rest.split_at(open);
            source.push_str(&regex::escape(literal));

            let remainder = &remainder[1..];
            let close = remainder.find('}').ok_or_else(|| RoutingError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "닫히지 않은 '{' 구분자".to_string(),
            })?;

            if close == 0 {
                return Err(RoutingError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: "빈 자리표시자 이름".to_string(),
                });
            }

            // 자리표시자는 경로 구분자를 제외한 1글자 이상과 매칭
            source.push_str("([^/]+)");
            param_count += 1;
            rest = &remainder[close + 1..];
        }

        source.push_str(&regex::escape(rest));
        source.push('$');

        let regex = regex::Regex::new(&source).map_err(|e| RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(RoutePattern {
            pattern: pattern.to_string(),
            regex,
            param_count,
        })
    }

    /// `"<METHOD> <path>"` 조회 문자열이 이 패턴과 완전히 일치하는지 검사합니다.
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// 원본 패턴 문자열을 반환합니다.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 패턴에 포함된 자리표시자 개수를 반환합니다.
    pub fn param_count(&self) -> usize {
        self.param_count
    }
}
