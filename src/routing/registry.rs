use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::debug;

use crate::routing::endpoint::{Endpoint, EndpointRecord};
use crate::routing::error::RoutingError;
use crate::routing::pattern::RoutePattern;

/// 선언된 엔드포인트 전체를 소유하는 레지스트리입니다.
///
/// 원본 패턴 문자열을 키로 사용하며, 같은 패턴을 다시 등록하면 이전
/// 항목을 덮어씁니다. 서버 시작이 끝나면 더 이상 변경되지 않고
/// 요청 처리 중에는 읽기 전용으로만 사용됩니다.
///
/// 조회는 결정적 우선순위를 따릅니다: 자리표시자가 적은 패턴이 먼저,
/// 같으면 더 긴 패턴이 먼저, 그다음 패턴 문자열 사전순. 정적 패턴과
/// 매개변수 패턴이 겹칠 때 맵 순회 순서에 의존하지 않습니다.
pub struct EndpointRegistry {
    endpoints: HashMap<String, Endpoint>,
    // 매칭 시도 순서. 등록 시점에 재계산됨
    order: Vec<String>,
    debug: bool,
}

impl EndpointRegistry {
    pub fn new(debug: bool) -> Self {
        EndpointRegistry {
            endpoints: HashMap::new(),
            order: Vec::new(),
            debug,
        }
    }

    /// 엔드포인트를 등록합니다. 패턴 컴파일과 핸들러 검증은 이 시점에
    /// 한 번만 수행되며, 실패는 시작 단계의 치명적 설정 오류입니다.
    pub fn register(&mut self, mut endpoint: Endpoint) -> Result<(), RoutingError> {
        endpoint.validate()?;
        let matcher = RoutePattern::compile(&endpoint.pattern)?;
        endpoint.set_matcher(matcher);

        self.endpoints.insert(endpoint.pattern.clone(), endpoint);
        self.rebuild_order();
        Ok(())
    }

    /// 엔드포인트 목록을 일괄 등록합니다. 디버그 모드에서는 각 패턴을
    /// 트레이스로 출력합니다.
    pub fn register_batch(&mut self, endpoints: Vec<Endpoint>) -> Result<(), RoutingError> {
        for endpoint in endpoints {
            if self.debug {
                debug!(pattern = %endpoint.pattern, "엔드포인트 등록");
            }
            self.register(endpoint)?;
        }
        Ok(())
    }

    fn rebuild_order(&mut self) {
        let mut order: Vec<String> = self.endpoints.keys().cloned().collect();
        order.sort_by_key(|pattern| {
            let params = self
                .endpoints
                .get(pattern)
                .map(Endpoint::param_count)
                .unwrap_or(0);
            (params, Reverse(pattern.len()), pattern.clone())
        });
        self.order = order;
    }

    /// 메서드와 경로로 엔드포인트를 조회합니다.
    ///
    /// `"<METHOD> <path>"` 조회 문자열을 만들어 우선순위 순서대로 매처를
    /// 시험하고 첫 번째 구조적 일치를 반환합니다.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&Endpoint> {
        let candidate = format!("{} {}", method, path);
        self.order
            .iter()
            .filter_map(|pattern| self.endpoints.get(pattern))
            .find(|endpoint| endpoint.matches(&candidate))
    }

    /// 등록된 모든 엔드포인트를 반환합니다.
    pub fn list(&self) -> Vec<&Endpoint> {
        self.order
            .iter()
            .filter_map(|pattern| self.endpoints.get(pattern))
            .collect()
    }

    /// 직렬화 가능한 엔드포인트 레코드 목록을 반환합니다.
    /// 핸들러 참조는 데이터가 아니므로 제외됩니다.
    pub fn records(&self) -> Vec<EndpointRecord> {
        self.list().into_iter().map(Endpoint::record).collect()
    }

    /// 요청에 해당하는 엔드포인트가 공개인지 확인합니다.
    /// 매칭되는 엔드포인트가 없으면 false입니다.
    pub fn is_public(&self, method: &str, path: &str) -> bool {
        self.lookup(method, path).map(Endpoint::is_public).unwrap_or(false)
    }

    /// 요청에 해당하는 엔드포인트가 인증을 요구하는지 확인합니다.
    pub fn requires_auth(&self, method: &str, path: &str) -> bool {
        self.lookup(method, path).map(Endpoint::requires_auth).unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
